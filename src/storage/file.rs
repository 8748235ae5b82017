//! Reading and writing SpecIF packages as JSON files.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;
use walkdir::WalkDir;

use crate::{domain::Package, storage::MemoryStore};

/// File extensions recognised as SpecIF packages when loading a directory.
const PACKAGE_EXTENSIONS: [&str; 2] = ["json", "specif"];

/// Errors that can occur when loading packages from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The path could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid SpecIF package.
    #[error("failed to parse {}", path.display())]
    Json {
        /// The offending path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A directory contained no package files.
    #[error("no SpecIF packages found in {}", .0.display())]
    Empty(PathBuf),
}

/// Read a single package from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid package.
pub fn load_package(path: &Path) -> Result<Package, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a package as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_package(package: &Package, path: &Path, pretty: bool) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_package(package, &mut writer, pretty)?;
    writer.flush()
}

/// Serialize a package as JSON to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_package<W: Write>(package: &Package, writer: &mut W, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, package)?;
    } else {
        serde_json::to_writer(&mut *writer, package)?;
    }
    writeln!(writer)
}

impl MemoryStore {
    /// Load a store from a package file, or from every package file below a
    /// directory.
    ///
    /// Directory entries are parsed in parallel and merged in path order, so
    /// when two files hold the same revision the later path wins.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, or if a
    /// directory holds no package files.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.is_dir() {
            return Ok(Self::from_package(load_package(path)?));
        }

        let paths = collect_package_paths(path);
        if paths.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        let packages = paths
            .par_iter()
            .map(|path| load_package(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut store = Self::default();
        for package in packages {
            tracing::debug!(id = %package.id, "adding package");
            store.add_package(package);
        }
        Ok(store)
    }
}

fn collect_package_paths(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| PACKAGE_EXTENSIONS.contains(&ext))
        })
        .collect();

    paths.sort();
    paths
}
