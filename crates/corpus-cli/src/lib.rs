//! Library surface of the corpus CLI.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    handle_ingest, handle_network, handle_search, handle_status, init_logging, load_settings,
};
