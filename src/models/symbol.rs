//! Resolved symbol model
//!
//! The record returned for a dotted-path lookup. Field names are a stable
//! contract for any consumer of the JSON output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a resolved symbol relates to the Python runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Keyword,
    Builtin,
    Module,
    StdlibMember,
    ThirdPartyMember,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Builtin => "builtin",
            Self::Module => "module",
            Self::StdlibMember => "stdlib_member",
            Self::ThirdPartyMember => "third_party_member",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation metadata for a dotted path
///
/// Absent values serialize as `null` rather than being skipped, so consumers
/// always see the full set of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub docstring: Option<String>,
    pub signature: Option<String>,
    pub module: String,
    pub qualname: String,
    pub is_stdlib: bool,
    pub url: Option<String>,
    pub kind: SymbolKind,
}

/// Terminal failure of a resolve request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionError {
    pub error: String,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Wire shape of a resolve request: either the record or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Symbol(ResolvedSymbol),
    Error(ResolutionError),
}

impl From<Result<ResolvedSymbol, ResolutionError>> for ResolveResponse {
    fn from(result: Result<ResolvedSymbol, ResolutionError>) -> Self {
        match result {
            Ok(symbol) => Self::Symbol(symbol),
            Err(error) => Self::Error(error),
        }
    }
}

impl ResolveResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn symbol(&self) -> Option<&ResolvedSymbol> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            Self::Error(_) => None,
        }
    }
}
