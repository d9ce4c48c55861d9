//! Plain-text documents split into pages.
//!
//! Pages are separated by form feeds, the separator `pdftotext` and similar tools emit.

use std::{fs, path::Path};

use tracing::debug;
use veritas_align::unique_sentences;

use crate::DocumentError;

/// Page separator in text documents.
pub const PAGE_SEPARATOR: char = '\x0c';

/// A document as a list of cleaned, non-empty pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Cleaned page texts. Page indices refer to this list.
    pages: Vec<String>,
}

impl Document {
    /// Splits `text` into pages, cleaning each and dropping blank ones.
    pub fn from_text(text: &str) -> Self {
        let pages: Vec<String> = text
            .split(PAGE_SEPARATOR)
            .map(clean_page)
            .filter(|page| !page.is_empty())
            .collect();
        debug!(pages = pages.len(), "document loaded");
        Self { pages }
    }

    /// Builds a document from already-separated pages.
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|page| clean_page(page.as_ref()))
                .filter(|page| !page.is_empty())
                .collect(),
        }
    }

    /// Reads a UTF-8 text document from disk.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    /// Cleaned page texts.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Sentences of every page, in page order.
    ///
    /// Each page's sentences are trimmed, longer than ten characters, and unique within the
    /// page.
    pub fn sentences_by_page(&self) -> Vec<Vec<String>> {
        self.pages
            .iter()
            .map(|page| unique_sentences(page))
            .collect()
    }
}

/// Replaces non-breaking spaces, collapses whitespace runs and trims.
pub fn clean_page(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '\u{202f}')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
