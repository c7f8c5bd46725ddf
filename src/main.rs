#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use crate::command::triangulate;
use crate::configuration::Configuration;
use crate::registry::RegistryResolver;
use crate::target::RepositoryOverride;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod attachment;
mod command;
mod configuration;
mod oci;
mod registry;
mod target;

// JSON logs on stderr, silent unless RUST_LOG is set.
fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
        .try_init();
}

fn main() -> ExitCode {
    let options: triangulate::Options = argh::from_env();

    set_tracing();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(command::Error::from)
        .and_then(|runtime| runtime.block_on(run_command(&options)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_command(options: &triangulate::Options) -> Result<(), command::Error> {
    let command = triangulate::Command::new(options)?;

    let config = match &options.config {
        Some(path) => Configuration::load(path)?,
        None => Configuration::default(),
    };

    let resolver = RegistryResolver::new(&config.client)?;
    let target = RepositoryOverride::from_env(&config.target);

    command.run(&resolver, &target, &mut io::stderr()).await
}
