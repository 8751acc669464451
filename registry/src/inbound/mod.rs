//! Inbound adapters driving the domain.
//!
//! - **cli**: clap-based command line that loads a snapshot file, applies one
//!   transition, and returns the next snapshot.

pub mod cli;
