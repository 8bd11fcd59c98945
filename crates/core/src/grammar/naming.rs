//! Mapping from editor language ids to grammar resource names.

use treescope_api::LanguageId;

const RESOURCE_PREFIX: &str = "tree-sitter-";

/// Language ids whose grammar resource does not follow `tree-sitter-<id>`.
const RESOURCE_EXCEPTIONS: &[(&str, &str)] = &[
    // Editors say `csharp`, the grammar is published as `c_sharp`.
    ("csharp", "c_sharp"),
    ("javascriptreact", "javascript"),
    ("typescriptreact", "tsx"),
    ("shellscript", "bash"),
];

/// Canonical grammar resource name for a language id, e.g. `tree-sitter-java`.
pub fn resource_name(language: &LanguageId) -> String {
    let id = language.as_str();
    let stem = RESOURCE_EXCEPTIONS
        .iter()
        .find(|(from, _)| *from == id)
        .map(|(_, to)| *to)
        .unwrap_or(id);
    format!("{}{}", RESOURCE_PREFIX, stem)
}

/// File name of the grammar library for the current platform.
pub fn library_file_name(resource: &str) -> String {
    format!("{}.{}", resource, std::env::consts::DLL_EXTENSION)
}

/// Exported constructor symbol of a grammar library, e.g. `tree_sitter_c_sharp`.
pub fn symbol_name(resource: &str) -> String {
    resource.replace('-', "_")
}
