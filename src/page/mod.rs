//! Page structure contract.
//!
//! A page is an element tree loaded from a JSON description. Widgets are
//! located in it by class and attribute markers (see [`Selector`]); a
//! missing marker simply means that widget instance does not exist.

mod types;

pub use types::{AttrMatch, Element, Node, NodeId, Page, Selector};

use std::path::Path;

use serde::Deserialize;

use crate::error::PageError;

/// On-disk page description.
#[derive(Debug, Deserialize)]
struct PageFile {
    #[serde(default)]
    title: String,
    root: Element,
}

impl Page {
    /// Parse a page from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Json`] when the text is not a valid page file.
    pub fn from_json(text: &str) -> Result<Self, PageError> {
        let file: PageFile = serde_json::from_str(text)?;
        Ok(Self::new(file.title, file.root))
    }

    /// Read and parse a page file.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if the file cannot be read and
    /// [`PageError::Json`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let text = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
