//! CLI command implementations

pub mod cache;
pub mod config;
pub mod dump;
pub mod list;
pub mod show;

pub use cache::execute as cache;
pub use config::execute as config;
pub use dump::execute as dump;
pub use list::execute as list;
pub use show::execute as show;
