//! Grammars and the process-wide grammar registry.
//!
//! * [`naming`]: language id → grammar resource name
//! * [`fetch`]: remote download of missing grammar libraries
//! * [`registry`]: load-once cache shared by all sessions

pub mod fetch;
mod loader;
pub mod naming;
pub mod registry;

pub use fetch::{GrammarFetcher, HttpGrammarFetcher};
pub use registry::GrammarRegistry;

use libloading::Library;
use std::fmt;
use std::path::PathBuf;
use treescope_api::LanguageId;

/// Where a loaded grammar came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarOrigin {
    /// Compiled into this binary.
    Builtin,
    /// Loaded from a shared library in the grammar cache.
    Library(PathBuf),
}

/// A loaded, immutable grammar.
pub struct Grammar {
    language_id: LanguageId,
    resource: String,
    language: tree_sitter::Language,
    origin: GrammarOrigin,
    // Declared last so the language is dropped before its library.
    _library: Option<Library>,
}

impl Grammar {
    pub(crate) fn builtin(
        language_id: LanguageId,
        resource: String,
        language: tree_sitter::Language,
    ) -> Self {
        Self {
            language_id,
            resource,
            language,
            origin: GrammarOrigin::Builtin,
            _library: None,
        }
    }

    pub(crate) fn from_library(
        language_id: LanguageId,
        resource: String,
        language: tree_sitter::Language,
        path: PathBuf,
        library: Library,
    ) -> Self {
        Self {
            language_id,
            resource,
            language,
            origin: GrammarOrigin::Library(path),
            _library: Some(library),
        }
    }

    pub fn language_id(&self) -> &LanguageId {
        &self.language_id
    }

    /// Canonical resource name, e.g. `tree-sitter-javascript`.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn language(&self) -> &tree_sitter::Language {
        &self.language
    }

    pub fn origin(&self) -> &GrammarOrigin {
        &self.origin
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("language_id", &self.language_id)
            .field("resource", &self.resource)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Grammars compiled into the binary, keyed by resource name.
pub fn builtin_language(resource: &str) -> Option<tree_sitter::Language> {
    match resource {
        "tree-sitter-javascript" => Some(tree_sitter_javascript::LANGUAGE.into()),
        "tree-sitter-java" => Some(tree_sitter_java::LANGUAGE.into()),
        _ => None,
    }
}
