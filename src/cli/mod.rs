//! CLI module
//!
//! Command-line interface for serving and rendering collections.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode over a service definition
//! - `links` - Render one page for a URL and print the envelope
//! - `strategies` - List the available link strategies

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};
