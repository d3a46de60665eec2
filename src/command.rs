use std::io::{Read, Write};

use anyhow::Result;
use period_timestamps::TimestampExtractor;
use tracing::debug;

/// What to do, chosen purely by how many arguments were passed.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Extract,
    Echo(String),
    TooMany,
}

impl Command {
    /// Picks a command from the arguments that follow the program name.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (None, _) => Command::Extract,
            (Some(arg), None) => Command::Echo(arg),
            (Some(_), Some(_)) => Command::TooMany,
        }
    }

    pub fn execute(self, input: impl Read, mut output: impl Write) -> Result<()> {
        debug!(command = ?self, "executing");

        match self {
            Command::Extract => {
                TimestampExtractor::local().process(input, output)?;
            }
            Command::Echo(arg) => writeln!(output, "one argv {arg}")?,
            Command::TooMany => writeln!(output, "argvs")?,
        }

        Ok(())
    }
}
