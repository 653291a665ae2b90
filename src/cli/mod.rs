pub mod commands;
pub mod serve;
pub mod ask;
pub mod providers;

pub use commands::{Cli, Commands};
