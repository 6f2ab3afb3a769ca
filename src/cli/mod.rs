//! CLI module
//!
//! Command-line interface over the [`Api`](crate::api::Api) session.
//!
//! # Commands
//!
//! - `check` - Verify the configured credentials
//! - `friends`, `followers`, `blocks` - User lists
//! - `friend-ids`, `follower-ids`, `block-ids` - Id lists
//! - `search` - Status search
//!
//! Every command prints one JSON message per line.

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, GraphArgs, IdListArgs, OutputFormat, SearchArgs, UserListArgs,
};
pub use runner::Runner;
