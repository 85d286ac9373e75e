use {
    anyhow::{Context, Result},
    std::io::{self, Write},
};

/// Decision source for the two confirmation gates. Production reads the
/// terminal; tests inject scripted answers.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Only an exact `y` (case-insensitive) is affirmative; everything else,
/// including end-of-input, declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{question}");
        io::stdout().flush().context("failed to flush stdout")?;
        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .context("failed to read confirmation from stdin")?;
        Ok(is_affirmative(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("  y \n"));

        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("\n"));
    }
}
