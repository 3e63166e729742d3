//! コマンドライン

pub mod args;

pub use args::{parse_args_from, Config, USAGE};
