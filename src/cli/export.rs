use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use specif_export::{
    ClassKeyPolicy, Config, ExportOptions, HierarchyExporter, Key, Package, storage,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(about = "Export a hierarchy with the resources it references")]
#[allow(clippy::struct_excessive_bools)]
pub struct Command {
    /// The hierarchy node to export, as ID or ID@REVISION
    hierarchy: Key,

    /// Include the classes, property classes and data types describing the
    /// exported data
    #[arg(long)]
    metadata: bool,

    /// Include statements attached to exported resources
    #[arg(long)]
    statements: bool,

    /// Include every revision of each exported resource
    #[arg(long)]
    revisions: bool,

    /// Shorthand for --metadata --statements --revisions
    #[arg(long)]
    all: bool,

    /// How class references without a revision are deduplicated
    #[arg(long, value_name = "POLICY")]
    class_keys: Option<ClassKeys>,

    /// Write the package to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write compact rather than pretty-printed JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ClassKeys {
    /// Look up unrevisioned references every time they are met
    Canonical,
    /// Look up each distinct reference once per export
    AsReferenced,
}

impl From<ClassKeys> for ClassKeyPolicy {
    fn from(value: ClassKeys) -> Self {
        match value {
            ClassKeys::Canonical => Self::Canonical,
            ClassKeys::AsReferenced => Self::AsReferenced,
        }
    }
}

impl Command {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, store: &Path, config: &Config) -> anyhow::Result<()> {
        let options = self.options(config);
        let store = super::load_store(store)?;

        let package = HierarchyExporter::new(&store, &store)
            .with_generator(config.generator.clone())
            .export_hierarchy(&self.hierarchy, options)?;

        let pretty = !self.compact;
        match &self.output {
            Some(path) => storage::save_package(&package, path, pretty)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => {
                let mut stdout = io::stdout().lock();
                storage::write_package(&package, &mut stdout, pretty)?;
                stdout.flush()?;
            }
        }

        print_summary(&self.hierarchy, &package);
        Ok(())
    }

    /// Command-line flags switch inclusions on; the configuration supplies the
    /// defaults.
    fn options(&self, config: &Config) -> ExportOptions {
        let defaults = config.export_options();
        ExportOptions {
            include_metadata: self.all || self.metadata || defaults.include_metadata,
            include_statements: self.all || self.statements || defaults.include_statements,
            include_revisions: self.all || self.revisions || defaults.include_revisions,
            class_keys: self.class_keys.map_or(defaults.class_keys, Into::into),
        }
    }
}

fn print_summary(hierarchy: &Key, package: &Package) {
    let counts = [
        ("resources", package.resources.len()),
        ("statements", package.statements.len()),
        ("resource classes", package.resource_classes.len()),
        ("statement classes", package.statement_classes.len()),
        ("property classes", package.property_classes.len()),
        ("data types", package.data_types.len()),
    ];

    eprintln!(
        "{} hierarchy {hierarchy} from project {}",
        "Exported".success(),
        package.id
    );
    for (label, count) in counts {
        let line = format!("  {count:>5} {label}");
        if count == 0 {
            eprintln!("{}", line.dim());
        } else {
            eprintln!("{line}");
        }
    }
}
