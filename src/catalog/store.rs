use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::signal::Signal;
use crate::core::types::ReferenceName;
use crate::parsing::signal::{parse_signal_file, ParseError};
use crate::utils::validation::{check_reference_limit, is_signal_file, MAX_REFERENCES};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to load reference '{name}': {source}")]
    Signal {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("Duplicate reference name: {0}")]
    DuplicateName(String),

    #[error("Too many references: {0} exceeds maximum allowed ({MAX_REFERENCES})")]
    TooManyReferences(usize),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// A named reference signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSignal {
    pub name: ReferenceName,

    #[serde(rename = "samples")]
    pub signal: Signal,
}

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub references: Vec<ReferenceSignal>,
}

/// The set of named reference signals an experimental signal is matched against.
///
/// Insertion order is preserved and defines iteration order, which in turn is
/// the tie-break order used when ranking.
#[derive(Debug, Default)]
pub struct ReferenceSet {
    /// All references, in insertion order
    references: Vec<ReferenceSignal>,

    /// Index: reference name -> index in references vec
    name_to_index: HashMap<ReferenceName, usize>,
}

impl ReferenceSet {
    /// Create an empty reference set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every signal file in a directory (non-recursive).
    ///
    /// Files are visited in file-name order and each reference is named after
    /// its file name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotADirectory` if `dir` is not a directory,
    /// `CatalogError::ReadError` if it cannot be listed, or
    /// `CatalogError::Signal` if any file fails to parse.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_signal_file(path))
            .collect();
        paths.sort();

        let mut set = Self::new();
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let signal = parse_signal_file(&path).map_err(|source| CatalogError::Signal {
                name: name.clone(),
                source,
            })?;
            set.insert(ReferenceName::new(name), signal)?;
        }

        debug!(dir = %dir.display(), references = set.len(), "Loaded reference directory");
        Ok(set)
    }

    /// Load a reference set from a JSON catalog file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read, or any
    /// error from [`ReferenceSet::from_json`].
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a reference set from a JSON catalog string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON or invalid signals,
    /// and `CatalogError::DuplicateName` if a name appears twice.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Catalog version mismatch"
            );
        }

        let mut set = Self::new();
        for reference in data.references {
            set.insert(reference.name, reference.signal)?;
        }

        Ok(set)
    }

    /// Serialize to the JSON catalog format
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            references: self.references.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Add a reference to the set
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateName` if the name is already present, or
    /// `CatalogError::TooManyReferences` if the set is full.
    pub fn insert(&mut self, name: ReferenceName, signal: Signal) -> Result<(), CatalogError> {
        if self.name_to_index.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name.0));
        }
        if check_reference_limit(self.references.len()).is_some() {
            return Err(CatalogError::TooManyReferences(self.references.len() + 1));
        }

        let index = self.references.len();
        self.name_to_index.insert(name.clone(), index);
        self.references.push(ReferenceSignal { name, signal });
        Ok(())
    }

    /// Get a reference signal by name
    #[must_use]
    pub fn get(&self, name: &ReferenceName) -> Option<&Signal> {
        self.name_to_index
            .get(name)
            .map(|&idx| &self.references[idx].signal)
    }

    #[must_use]
    pub fn contains(&self, name: &ReferenceName) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Iterate references in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceSignal> {
        self.references.iter()
    }

    /// References as a slice, in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[ReferenceSignal] {
        &self.references
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a ReferenceSignal;
    type IntoIter = std::slice::Iter<'a, ReferenceSignal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
