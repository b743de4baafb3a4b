//! Definitions directory adapter.
//!
//! # Directory layout expected
//!
//! ```text
//! definitions/
//! ├── tables/
//! │   ├── users.td
//! │   ├── posts.td
//! │   └── timestamps_base.td   ← base tables live with ordinary tables
//! └── pivots/
//!     └── role_user.td
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

use tabledef_core::{
    application::{ApplicationError, ports::DefinitionSource},
    domain::TableType,
    error::TabledefResult,
};

/// File extension of a definition file.
pub const DEFINITION_EXTENSION: &str = "td";

/// Reads `*.td` files from a definitions directory.
#[derive(Debug, Clone)]
pub struct FsDefinitionSource {
    root: PathBuf,
}

impl FsDefinitionSource {
    /// Create a source rooted at `root`.
    ///
    /// The directory does not need to exist; missing collections list as
    /// empty and every read returns `None`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding definitions of `table_type`.
    pub fn collection_dir(&self, table_type: TableType) -> PathBuf {
        match table_type.storage() {
            TableType::Pivot => self.root.join("pivots"),
            _ => self.root.join("tables"),
        }
    }

    /// Path of a single definition file.
    pub fn definition_path(&self, table_type: TableType, name: &str) -> PathBuf {
        self.collection_dir(table_type)
            .join(format!("{name}.{DEFINITION_EXTENSION}"))
    }

    /// Create the `tables/` and `pivots/` directories.
    pub fn ensure_layout(&self) -> TabledefResult<()> {
        for table_type in [TableType::Table, TableType::Pivot] {
            let dir = self.collection_dir(table_type);
            fs::create_dir_all(&dir).map_err(|e| listing_error(&dir, &e))?;
        }
        Ok(())
    }

    /// Write a definition file, creating its collection directory.
    pub fn write(&self, table_type: TableType, name: &str, text: &str) -> TabledefResult<PathBuf> {
        check_name(name)?;
        let path = self.definition_path(table_type, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| listing_error(parent, &e))?;
        }
        fs::write(&path, text).map_err(|e| source_error(name, &path, &e))?;
        debug!(path = %path.display(), "Definition written");
        Ok(path)
    }
}

impl DefinitionSource for FsDefinitionSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn read(&self, table_type: TableType, name: &str) -> TabledefResult<Option<String>> {
        check_name(name)?;
        let path = self.definition_path(table_type, name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                trace!(path = %path.display(), bytes = text.len(), "Read definition");
                Ok(Some(text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(source_error(name, &path, &e)),
        }
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn list(&self, table_type: TableType) -> TabledefResult<Vec<String>> {
        let dir = self.collection_dir(table_type);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Collection directory missing, nothing to list");
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                ApplicationError::ListingFailed {
                    path: dir.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DEFINITION_EXTENSION) {
                trace!(path = %path.display(), "Ignoring non-definition file");
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        debug!(count = names.len(), "Listed definitions");
        Ok(names)
    }
}

fn check_name(name: &str) -> TabledefResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ApplicationError::SourceError {
            table: name.to_string(),
            reason: "table names cannot contain path separators".into(),
        }
        .into());
    }
    Ok(())
}

fn source_error(name: &str, path: &Path, e: &io::Error) -> tabledef_core::error::TabledefError {
    ApplicationError::SourceError {
        table: name.to_string(),
        reason: format!("{}: {e}", path.display()),
    }
    .into()
}

fn listing_error(path: &Path, e: &io::Error) -> tabledef_core::error::TabledefError {
    ApplicationError::ListingFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}
