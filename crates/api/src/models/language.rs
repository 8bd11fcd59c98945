use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Editor language identifier (e.g. `javascript`, `csharp`).
///
/// This is the id the host editor reports for a document, not the name of the
/// grammar resource that parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(Cow<'static, str>);

impl LanguageId {
    pub const JAVASCRIPT: LanguageId = LanguageId(Cow::Borrowed("javascript"));
    pub const JAVA: LanguageId = LanguageId(Cow::Borrowed("java"));
    pub const CSHARP: LanguageId = LanguageId(Cow::Borrowed("csharp"));
    pub const TYPESCRIPT: LanguageId = LanguageId(Cow::Borrowed("typescript"));
    pub const PYTHON: LanguageId = LanguageId(Cow::Borrowed("python"));
    pub const RUST: LanguageId = LanguageId(Cow::Borrowed("rust"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LanguageId {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for LanguageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for LanguageId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
