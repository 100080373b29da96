//! Session handling for the CLI.

mod console;
pub mod storage;

pub use console::Console;
