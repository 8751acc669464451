//! Apply one registry transition to a snapshot file and print the result.
//!
//! This binary delegates to `gift_registry::inbound::cli` for parsing and
//! transition logic; it only wires logging, configuration, and the book
//! lookup adapter.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use gift_registry::config::RegistrySettings;
use gift_registry::domain::ports::{BookLookup, FixtureBookLookup};
use gift_registry::inbound::cli::{Cli, execute, render_state};
use gift_registry::outbound::open_library::{OpenLibraryBookLookup, OpenLibraryIdentity};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = RegistrySettings::load_from_iter([OsString::from("gift-registry")])
        .wrap_err("failed to load registry settings")?;
    let lookup = build_lookup(&settings)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    let next = runtime.block_on(execute(&cli.command, lookup.as_ref()))?;

    let rendered = render_state(&next)?;
    writeln!(io::stdout().lock(), "{rendered}").wrap_err("failed to write snapshot")?;
    Ok(())
}

fn build_lookup(settings: &RegistrySettings) -> Result<Box<dyn BookLookup>> {
    if settings.offline {
        return Ok(Box::new(FixtureBookLookup::default()));
    }
    let base_url = settings
        .lookup_base_url()
        .wrap_err("invalid lookup base URL")?;
    let identity = OpenLibraryIdentity {
        user_agent: settings.user_agent().to_owned(),
    };
    let lookup =
        OpenLibraryBookLookup::with_identity(&base_url, settings.lookup_timeout(), identity)
            .wrap_err("failed to build Open Library client")?;
    Ok(Box::new(lookup))
}
