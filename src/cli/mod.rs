//! CLI commands

mod context;
mod list;
mod run;
pub mod style;

pub use list::run_list;
pub use run::{RunOptions, run_bot};
