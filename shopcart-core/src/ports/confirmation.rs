//! Confirmation port - yes/no questions for the user

use crate::domain::result::Result;

/// Asks the user a yes/no question
///
/// The checkout flow uses this before taking payment. Front ends implement it
/// with whatever prompt they have (terminal, dialog box, a `--yes` flag).
pub trait Confirmation {
    /// Returns `Ok(true)` if the user agreed
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Answers every question with the same fixed reply
#[derive(Debug, Clone, Copy)]
pub struct AlwaysConfirm(pub bool);

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
