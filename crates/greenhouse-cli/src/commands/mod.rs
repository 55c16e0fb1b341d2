//! Command implementations for the CLI.

mod config;
mod read;
mod set;
mod watch;

pub use config::{cmd_config, run_config_action};
pub use read::{ReadArgs, cmd_read, render_read};
pub use set::cmd_set;
pub use watch::{WatchArgs, cmd_watch};
