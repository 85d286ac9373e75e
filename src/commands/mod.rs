pub mod deploy;
pub mod run_tests;
