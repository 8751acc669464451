//! Command-line driver for registry transitions.
//!
//! Each subcommand reads a snapshot from `--state`, applies one transition,
//! and hands back the next snapshot. The binary only wires adapters and
//! writes the rendered JSON; everything here runs without spawning a process.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::domain::ports::BookLookup;
use crate::domain::{
    GiftId, Isbn, Snapshot, add_book, add_gift, get_books_details, toggle_reservation,
};

mod error;

pub use error::CliError;

/// `gift-registry` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gift-registry",
    about = "Derive gift registry snapshots without touching the input",
    version
)]
pub struct Cli {
    /// Transition to apply.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported transitions.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Append an unreserved gift.
    AddGift {
        /// Path to the registry snapshot JSON.
        #[arg(long, value_name = "path")]
        state: PathBuf,
        /// Identifier for the new gift.
        #[arg(long, value_name = "id")]
        id: String,
        /// Human-readable description.
        #[arg(long, value_name = "text")]
        description: String,
        /// Image URI; empty when omitted.
        #[arg(long, value_name = "uri", default_value = "")]
        image: String,
    },
    /// Claim a gift for the acting user.
    Reserve {
        /// Path to the registry snapshot JSON.
        #[arg(long, value_name = "path")]
        state: PathBuf,
        /// Identifier of the gift to claim.
        #[arg(long = "gift-id", value_name = "id")]
        gift_id: String,
    },
    /// Look up books and append one gift per ISBN, in argument order.
    AddBook {
        /// Path to the registry snapshot JSON.
        #[arg(long, value_name = "path")]
        state: PathBuf,
        /// ISBN-10 or ISBN-13 identifiers.
        #[arg(value_name = "isbn", required = true, num_args = 1..)]
        isbns: Vec<String>,
    },
}

impl Command {
    /// Path of the snapshot the command reads.
    #[must_use]
    pub fn state_path(&self) -> &Path {
        match self {
            Self::AddGift { state, .. } | Self::Reserve { state, .. } | Self::AddBook { state, .. } => {
                state
            }
        }
    }
}

/// Read and decode a snapshot file.
///
/// # Errors
///
/// Returns [`CliError::ReadState`] or [`CliError::DecodeState`].
pub fn load_state(path: &Path) -> Result<Snapshot, CliError> {
    let raw = fs::read(path).map_err(|error| CliError::read_state(path, &error))?;
    serde_json::from_slice(&raw).map_err(|error| CliError::decode_state(path, &error))
}

/// Encode a snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CliError::EncodeState`] when serialisation fails.
pub fn render_state(state: &Snapshot) -> Result<String, CliError> {
    serde_json::to_string_pretty(state).map_err(|error| CliError::EncodeState {
        message: error.to_string(),
    })
}

/// Load the command's snapshot and apply its transition.
///
/// Book lookups for `add-book` run concurrently; the resulting gifts are
/// appended in the order the ISBNs were given.
///
/// # Errors
///
/// Returns [`CliError`] when the snapshot cannot be loaded, an argument is
/// invalid, a lookup fails, or the transition is refused.
pub async fn execute(command: &Command, lookup: &dyn BookLookup) -> Result<Snapshot, CliError> {
    let state = load_state(command.state_path())?;
    match command {
        Command::AddGift {
            id,
            description,
            image,
            ..
        } => {
            let gift_id = GiftId::new(id.as_str())?;
            info!(%gift_id, "adding gift");
            Ok(add_gift(&state, gift_id, description.as_str(), image.as_str())?)
        }
        Command::Reserve { gift_id, .. } => {
            let target = GiftId::new(gift_id.as_str())?;
            info!(gift_id = %target, "reserving gift");
            Ok(toggle_reservation(&state, &target)?)
        }
        Command::AddBook { isbns, .. } => {
            let parsed = isbns
                .iter()
                .map(String::as_str)
                .map(Isbn::parse)
                .collect::<Result<Vec<_>, _>>()?;
            info!(count = parsed.len(), "adding books");
            let mut next = state;
            for result in get_books_details(lookup, &parsed).await {
                next = add_book(&next, &result?)?;
            }
            Ok(next)
        }
    }
}
