//! CLI module containing argument parsing and related functionality

pub mod args;
pub mod tags;

pub use args::Args;
pub use tags::split_tags_flag;
