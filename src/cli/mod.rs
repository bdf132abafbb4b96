pub mod commands;
pub mod display;
pub mod pager;

pub use commands::{Cli, Commands};
pub use pager::{Pager, PagerCommand, PagerExit};
