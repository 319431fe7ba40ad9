//! Parley is a terminal client for a remote chat service reachable over HTTP.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the submission lifecycle, the HTTP
//!   transport adapter, and configuration.
//! - [`api`] defines the wire payloads exchanged with the chat service and
//!   the rule used to pull reply text out of a response body.
//! - [`ui`] runs the line-oriented chat loop that feeds user input into the
//!   conversation controller and prints the entries it produces.
//! - [`commands`] implements the slash commands understood by the chat loop.
//! - [`cli`] parses arguments and dispatches subcommands.
//! - [`utils`] holds URL helpers, diagnostics setup, and the transcript log.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
