use {
    anyhow::Result,
    clap::{Args, Parser, Subcommand},
    log::error,
    shipit::utils::{console, RollbackHandle},
};

#[derive(Parser)]
#[command(name = "shipit", about = "Release and test automation", version)]
struct Shipit {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Bump the manifest version, build, and upload to the registry")]
    Deploy(shipit::commands::deploy::CommandArgs),
    #[command(about = "Run the package test suite")]
    Test(shipit::commands::run_tests::CommandArgs),
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        console::error(&err.to_string());
        for (i, cause) in err.chain().skip(1).enumerate() {
            error!("  {}: {}", i.saturating_add(1), cause);
        }
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    let shipit = match Shipit::try_parse() {
        Ok(shipit) => shipit,
        Err(err) => {
            // Usage problems exit 1 like every other failure; --help and
            // --version still exit 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if shipit.global.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // An operator interrupt after the manifest has been mutated must restore
    // the backup before exiting; before that the handle is unarmed and this
    // only exits.
    let rollback = RollbackHandle::new();
    {
        let rollback = rollback.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                console::warning("Interrupted");
                rollback.restore_if_armed();
                std::process::exit(1);
            }
        });
    }

    match shipit.command {
        Commands::Deploy(args) => shipit::commands::deploy::run(args, rollback)?,
        Commands::Test(args) => shipit::commands::run_tests::run(args)?,
    }

    Ok(())
}
