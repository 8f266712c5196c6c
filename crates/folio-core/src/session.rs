//! Open documents and their file I/O.
//!
//! `DocumentId` is a newtype around a `Uuid` so an id can never be
//! confused with an index or a path. The session keeps a second index
//! from canonical path to id, which is how opening a file that is
//! already open finds the existing entry.

use folio_buffer::{SelectionModel, TextDocument};
use folio_search::{MatchSet, Query, SearchIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{Config, CoreError, CoreResult};

/// Unique identifier for an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Creates a new unique document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open document and its selection.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub document: TextDocument,
    pub selection: SelectionModel,
}

impl Entry {
    /// Wraps a document with a caret at the start.
    pub fn new(document: TextDocument) -> Self {
        Self {
            document,
            selection: SelectionModel::default(),
        }
    }

    /// Runs a query against the document.
    pub fn find(&self, query: Query) -> CoreResult<MatchSet> {
        Ok(SearchIndex::new(query)?.find_all(&self.document))
    }

    /// Replaces every match of `query`, or only those inside the current
    /// selection when `in_selection` is set.
    pub fn replace(&mut self, query: Query, replacement: &str, in_selection: bool) -> CoreResult<usize> {
        let index = SearchIndex::new(query)?;
        let count = if in_selection {
            index.replace_in_selection(&mut self.document, &self.selection, replacement)?
        } else {
            index.replace_all(&mut self.document, replacement)?
        };
        self.selection.clamp_to(&self.document);
        Ok(count)
    }

    /// Selects a 1-indexed line. Out-of-range lines are ignored.
    pub fn goto_line(&mut self, line: usize) -> bool {
        self.selection.select_lines(&self.document, line, line)
    }
}

/// All documents open in one window.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,

    entries: HashMap<DocumentId, Entry>,

    /// Canonical path of each saved or loaded document
    by_path: HashMap<PathBuf, DocumentId>,

    /// Order of documents (for tabs)
    order: Vec<DocumentId>,

    /// Currently active document
    active: Option<DocumentId>,
}

impl Session {
    /// Creates an empty session.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adds an empty, untitled document and makes it active.
    pub fn new_document(&mut self) -> DocumentId {
        self.insert(Entry::default())
    }

    /// Opens a file, or activates it if it is already open.
    ///
    /// Files over the configured size limit are refused before reading.
    /// Binary and non-UTF-8 files fail without touching the session.
    pub fn open(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let path = fs::canonicalize(path.as_ref())?;
        if let Some(&id) = self.by_path.get(&path) {
            self.active = Some(id);
            return Ok(id);
        }

        let size = fs::metadata(&path)?.len();
        let limit = self.config.files.max_bytes();
        if size > limit {
            tracing::warn!("Refusing to open {}: {} bytes", path.display(), size);
            return Err(CoreError::FileTooLarge {
                path: path.display().to_string(),
                size,
                limit,
            });
        }

        let bytes = fs::read(&path)?;
        let mut document = TextDocument::load(&bytes)?;
        document.set_path(&path);
        tracing::info!("Opened {} ({} lines)", path.display(), document.line_count());

        let id = self.insert(Entry::new(document));
        self.by_path.insert(path, id);
        Ok(id)
    }

    /// Writes a document to its own path.
    pub fn save(&mut self, id: DocumentId) -> CoreResult<()> {
        let path = self
            .get(id)?
            .document
            .path()
            .map(Path::to_path_buf)
            .ok_or(CoreError::NoPath(id))?;
        self.save_as(id, path)
    }

    /// Writes a document to `path` and records it as the document's path.
    ///
    /// The serialized text goes to a temporary sibling first and is then
    /// renamed over the target.
    pub fn save_as(&mut self, id: DocumentId, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let bytes = self.get(id)?.document.serialize();

        let temp_path = path.with_extension("folio-tmp");
        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, path)?;

        let canonical = fs::canonicalize(path)?;
        self.by_path.retain(|_, &mut other| other != id);
        self.by_path.insert(canonical.clone(), id);
        self.get_mut(id)?.document.mark_saved(canonical);
        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Closes a document, discarding unsaved changes.
    pub fn close(&mut self, id: DocumentId) -> CoreResult<Entry> {
        let entry = self.entries.remove(&id).ok_or(CoreError::DocumentNotFound(id))?;
        self.by_path.retain(|_, &mut other| other != id);
        self.order.retain(|&other| other != id);
        if self.active == Some(id) {
            self.active = self.order.last().copied();
        }
        Ok(entry)
    }

    /// Returns an entry by ID.
    pub fn get(&self, id: DocumentId) -> CoreResult<&Entry> {
        self.entries.get(&id).ok_or(CoreError::DocumentNotFound(id))
    }

    /// Returns a mutable entry by ID.
    pub fn get_mut(&mut self, id: DocumentId) -> CoreResult<&mut Entry> {
        self.entries.get_mut(&id).ok_or(CoreError::DocumentNotFound(id))
    }

    /// Finds an open document by path.
    pub fn find_by_path(&self, path: impl AsRef<Path>) -> Option<DocumentId> {
        let path = fs::canonicalize(path.as_ref()).ok()?;
        self.by_path.get(&path).copied()
    }

    /// Returns the active entry.
    pub fn active(&self) -> Option<&Entry> {
        self.active.and_then(|id| self.entries.get(&id))
    }

    /// Returns the active document's ID.
    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    /// Sets the active document.
    pub fn set_active(&mut self, id: DocumentId) {
        if self.entries.contains_key(&id) {
            self.active = Some(id);
        }
    }

    /// Returns the document order (for tabs).
    pub fn order(&self) -> &[DocumentId] {
        &self.order
    }

    /// Returns the IDs of documents with unsaved changes.
    pub fn modified(&self) -> Vec<DocumentId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.entries[id].document.is_modified())
            .collect()
    }

    /// Returns the number of open documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no documents are open.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: Entry) -> DocumentId {
        let id = DocumentId::new();
        self.entries.insert(id, entry);
        self.order.push(id);
        self.active = Some(id);
        id
    }
}
