#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]

mod command;

use std::{env, io};

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use command::Command;

fn main() -> Result<()> {
    // stdout carries the timestamps, logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    Command::from_args(env::args().skip(1)).execute(io::stdin().lock(), io::stdout().lock())
}
