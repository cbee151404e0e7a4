use std::{
    io,
    path::{Path, PathBuf},
};

mod operation;
mod shell;
mod terminal;

use clap::ArgAction;
use libris::{Catalog, Config, FlatFileStore};
use operation::Operation;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the catalog files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.unwrap_or(Command::Shell).run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout belongs to command output and the shell prompt
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Start an interactive session (default)
    ///
    /// Borrow requests and the undo history are kept for the length of the
    /// session.
    Shell,

    /// Initialize a catalog directory with a default configuration
    Init(Init),

    #[command(flatten)]
    Operation(Operation),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Shell => {
                let mut catalog = open_catalog(root)?;
                shell::run(
                    &mut catalog,
                    io::stdin().lock(),
                    &mut io::stdout().lock(),
                )?;
            }
            Self::Init(command) => command.run(root)?,
            Self::Operation(operation) => {
                let mut catalog = open_catalog(root)?;
                operation.execute(&mut catalog, &mut io::stdout().lock())?;
            }
        }
        Ok(())
    }
}

fn open_catalog(root: &Path) -> anyhow::Result<Catalog<FlatFileStore>> {
    let config = Config::load_or_default(root);
    let store = FlatFileStore::from_config(root, &config);
    tracing::info!("Loading catalog from {}", store.books_path().display());
    Ok(Catalog::open(store, &config)?)
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// First id to count from; new books get ids above it
    #[arg(long)]
    id_seed: Option<libris::RecordId>,
}

impl Init {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(Config::FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Catalog already initialized (found existing {})",
                Config::FILE_NAME
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        let mut config = Config::default();
        if let Some(seed) = self.id_seed {
            config.set_id_seed(seed);
        }
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", Config::FILE_NAME))?;

        println!("Initialized library catalog in {}", root.display());
        println!("  Created: {}", Config::FILE_NAME);
        println!();
        println!("Next steps:");
        println!("  libris add \"Your First Book\" \"Its Author\"");

        Ok(())
    }
}
