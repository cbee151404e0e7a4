//! Interactive session over one open catalog.
//!
//! The borrow queue and the undo log live only in memory, so they last for
//! as long as the shell does.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use libris::{Catalog, Store};
use tracing::{debug, instrument};

use super::{operation::Operation, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(name = "libris", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: LineCommand,
}

#[derive(Debug, Subcommand)]
enum LineCommand {
    #[command(flatten)]
    Operation(Operation),

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Reads commands from `input` until `exit` or end of input, writing every
/// response to `out`.
///
/// Failed commands are reported and the session carries on.
#[instrument(skip_all)]
pub fn run<S: Store>(
    catalog: &mut Catalog<S>,
    input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "Welcome to the library catalog. Type 'help' for commands."
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(text) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };

        let words = match shell_words::split(&text) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "{}", format!("⚠️  {e}").warning())?;
                continue;
            }
        };

        let command = match Line::try_parse_from(words) {
            Ok(line) => line.command,
            Err(e) => {
                // help and usage errors both land here
                write!(out, "{}", e.render())?;
                continue;
            }
        };

        match command {
            LineCommand::Exit => break,
            LineCommand::Operation(operation) => {
                if let Err(e) = operation.execute(catalog, out) {
                    debug!("command failed: {e:#}");
                    writeln!(out, "{}", format!("⚠️  {e:#}").warning())?;
                }
            }
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}
