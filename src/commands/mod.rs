//! Command implementations for the CLI

pub mod check;
pub mod list;
pub mod new;
pub mod show;
pub mod watch;
