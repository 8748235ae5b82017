use std::path::Path;

use specif_export::{Node, Versioned};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, clap::Parser)]
#[command(about = "List the hierarchy roots held by the store")]
pub struct Command {
    /// Print only the hierarchy keys
    #[arg(long)]
    quiet: bool,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, store: &Path) -> anyhow::Result<()> {
        let store = super::load_store(store)?;
        let hierarchies = store.hierarchies();

        if hierarchies.is_empty() {
            eprintln!("{}", "No hierarchies found.".warning());
            return Ok(());
        }

        for root in hierarchies {
            if self.quiet {
                println!("{}", root.key());
                continue;
            }

            println!("{}", row(root));
        }

        Ok(())
    }
}

/// One listing line: key, project and node count, without styling so the
/// output can be piped.
fn row(root: &Node) -> String {
    let key = root.key().to_string();
    let project = root.project_id.as_deref().unwrap_or("-");
    format!("{key:<24} {project:<16} {} nodes", root.node_count())
}
