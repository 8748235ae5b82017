use std::path::{Path, PathBuf};

mod export;
mod hierarchies;
mod terminal;

use clap::ArgAction;
use specif_export::{Config, MemoryStore};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// A SpecIF package file, or a directory of package files
    #[arg(short, long, default_value = ".", global = true)]
    store: PathBuf,

    /// Export configuration file (TOML); defaults apply if it is missing
    #[arg(short, long, default_value = "specif-export.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::load_or_default(&self.config);
        self.command.run(&self.store, &config)
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

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
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
    /// Export a hierarchy and everything it references as a SpecIF package
    Export(export::Command),

    /// List the hierarchies in the store
    Hierarchies(hierarchies::Command),
}

impl Command {
    fn run(self, store: &Path, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Export(command) => command.run(store, config),
            Self::Hierarchies(command) => command.run(store),
        }
    }
}

fn load_store(path: &Path) -> anyhow::Result<MemoryStore> {
    use anyhow::Context;

    MemoryStore::load(path).with_context(|| format!("failed to load store {}", path.display()))
}
