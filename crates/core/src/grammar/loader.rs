//! Loading of grammars compiled into shared libraries.

use super::naming::symbol_name;
use crate::error::{Result, TreescopeError};
use libloading::{Library, Symbol};
use std::path::Path;
use tree_sitter::Language;
use tree_sitter_language::LanguageFn;

/// Open `path` and call its `tree_sitter_<name>` constructor.
///
/// The returned library must outlive every use of the language.
pub(crate) fn load_library(path: &Path, resource: &str) -> Result<(Library, Language)> {
    let library = unsafe { Library::new(path) }.map_err(|e| {
        TreescopeError::grammar_unavailable(
            resource,
            format!("failed to load {}: {}", path.display(), e),
        )
    })?;

    let symbol = symbol_name(resource);
    let language = unsafe {
        let constructor: Symbol<unsafe extern "C" fn() -> *const ()> =
            library.get(symbol.as_bytes()).map_err(|e| {
                TreescopeError::grammar_unavailable(
                    resource,
                    format!("missing symbol {}: {}", symbol, e),
                )
            })?;
        Language::new(LanguageFn::from_raw(*constructor))
    };

    Ok((library, language))
}
