//! Response types for CLI output
//!
//! Resolve responses reuse [`crate::models::ResolveResponse`]; the types here
//! cover the remaining commands.

use serde::Serialize;

use crate::infra::registry::RuntimeInfo;

/// Response for the locate command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateResponse {
    /// Category label or qualified function name; `null` when nothing matched
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Response for the version command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionResponse {
    /// `major.minor` of the described runtime
    pub version: String,
    pub full_version: String,
}

impl From<&RuntimeInfo> for VersionResponse {
    fn from(runtime: &RuntimeInfo) -> Self {
        Self {
            version: runtime.short_version(),
            full_version: runtime.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_uses_type_key() {
        let json = serde_json::to_value(LocateResponse {
            kind: Some("f-string".to_string()),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "f-string"}));

        let json = serde_json::to_value(LocateResponse { kind: None }).unwrap();
        assert_eq!(json, serde_json::json!({"type": null}));
    }
}
