//! Terminal output with automatic fallback to plain text
//!
//! Interactive terminals get `cliclack` log lines and an `indicatif` spinner
//! while remote requests are in flight. Pipes and CI get plain, greppable
//! lines and no spinner.
//!
//! # Example
//!
//! ```rust,ignore
//! use pkgcat::ui::{self, UiContext, FetchSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! let spinner = FetchSpinner::start(&ctx, "Fetching package catalog");
//! // ... request ...
//! spinner.finish();
//!
//! ui::step_ok_detail(&ctx, "Cache cleared", "/home/me/.cache/pkgcat");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, remark, section, step_info, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::FetchSpinner;
pub use prompts::confirm;
