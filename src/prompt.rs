// User-facing confirmation and notices

use colored::Colorize;
use dialoguer::Confirm;
use tracing::warn;

/// The blocking questions and notices the controller needs from a user
pub trait Prompt {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a notice the user has to acknowledge
    fn notice(&mut self, message: &str);
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    /// Answer yes to every confirmation without asking
    pub assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new().with_prompt(message).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                // No terminal to ask on counts as "no"
                warn!(error = ?e, "Confirmation prompt failed");
                false
            }
        }
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{}", message.red().bold());
    }
}

/// Replays canned answers and records what was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Vec<bool>,
    pub asked: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedPrompt {
    /// Answer confirmations in order; once exhausted every answer is "no"
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        let mut answers: Vec<bool> = answers.into_iter().collect();
        answers.reverse();
        Self {
            answers,
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.answers.pop().unwrap_or(false)
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
