//! Error types for pyhover

use thiserror::Error;

pub type PyhoverResult<T> = std::result::Result<T, PyhoverError>;

#[derive(Debug, Error)]
pub enum PyhoverError {
    #[error("{0}")]
    Locate(#[from] LocateError),

    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("Failed to initialize Python grammar: {0}")]
    Grammar(String),

    #[error("Parser lock poisoned")]
    LockPoisoned,
}

/// Failure to load a module from the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("No module named '{0}'")]
    NotFound(String),

    #[error("No module named '{name}'; '{parent}' is not a package")]
    NotAPackage { name: String, parent: String },

    #[error("Error while loading '{module}': {message}")]
    Failed { module: String, message: String },
}

impl LoadError {
    pub fn failed(module: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            module: module.to_string(),
            message: message.into(),
        }
    }

    pub fn module(&self) -> &str {
        match self {
            Self::NotFound(name) | Self::NotAPackage { name, .. } => name,
            Self::Failed { module, .. } => module,
        }
    }
}

/// Failure to build a registry from an introspection snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Module '{module}' references unknown module '{target}'")]
    UnknownModule { module: String, target: String },

    #[error("Introspection with {python} failed: {message}")]
    Interpreter { python: String, message: String },

    #[error("Module reference cycle through '{0}'")]
    Cycle(String),

    #[error("Class '{class}' not found in module '{owner}'")]
    UnknownClass { class: String, owner: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    pub fn parse(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub fn interpreter(python: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Interpreter {
            python: python.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_messages() {
        let err = LoadError::NotFound("zzz".to_string());
        assert_eq!(err.to_string(), "No module named 'zzz'");
        assert_eq!(err.module(), "zzz");

        let err = LoadError::NotAPackage {
            name: "builtins.list".to_string(),
            parent: "builtins".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No module named 'builtins.list'; 'builtins' is not a package"
        );
    }

    #[test]
    fn test_load_error_failed_helper() {
        let err = LoadError::failed("antigravity", "webbrowser unavailable");
        assert_eq!(err.module(), "antigravity");
        assert!(err.to_string().contains("webbrowser unavailable"));
    }

    #[test]
    fn test_wrapping_into_top_level() {
        let err: PyhoverError = SnapshotError::Cycle("os".to_string()).into();
        assert_eq!(err.to_string(), "Module reference cycle through 'os'");
    }
}
