//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{PkgcatError, PkgcatResult};

/// Ask a yes/no question.
///
/// `--yes` answers yes; non-interactive runs take `default`.
pub fn confirm(ctx: &UiContext, message: &str, default: bool) -> PkgcatResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    cliclack::confirm(message)
        .initial_value(default)
        .interact()
        .map_err(|e| PkgcatError::User(format!("Prompt failed: {}", e)))
}
