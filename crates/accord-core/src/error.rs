//! Error taxonomy for the lifecycle engine.
//!
//! Two layers: [`EngineError`] is the typed error handlers can surface past
//! their boundary (expected conditions like a missing target never reach it —
//! those are swallowed into no-op outcomes), and [`ErrorCode`] is the stable
//! machine-readable catalog for logs and embedding surfaces.

use std::fmt;

use crate::registry::RegistryError;

/// Machine-readable error codes for embedder-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    AssociationNotFound,
    ItemNotFound,
    DuplicateId,
    RegistryUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::AssociationNotFound => "E2001",
            Self::ItemNotFound => "E2002",
            Self::DuplicateId => "E2003",
            Self::RegistryUnavailable => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::AssociationNotFound => "Association not found",
            Self::ItemNotFound => "Item not found",
            Self::DuplicateId => "Entity id already exists",
            Self::RegistryUnavailable => "Registry unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the engine config file and retry."),
            Self::AssociationNotFound | Self::ItemNotFound => None,
            Self::DuplicateId => Some("Creates require a fresh id; fetch and update instead."),
            Self::RegistryUnavailable => {
                Some("Check the external registry and retry the operation.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors an operation handler can surface past its boundary.
///
/// Missing targets on update/grant/revoke/delete never appear here — per the
/// lifecycle contract they degrade to no-op outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A create was attempted against an id that already exists.
    #[error("duplicate id '{id}' on create")]
    Conflict {
        /// The colliding id.
        id: String,
    },

    /// The external registry failed in a way the lifecycle policy does not
    /// absorb.
    #[error("registry failure: {0}")]
    Registry(#[from] RegistryError),
}

impl EngineError {
    /// The stable catalog code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Conflict { .. } => ErrorCode::DuplicateId,
            Self::Registry(RegistryError::Unavailable { .. }) => ErrorCode::RegistryUnavailable,
            Self::Registry(RegistryError::Conflict { .. }) => ErrorCode::DuplicateId,
            Self::Registry(RegistryError::NotFound { .. }) => ErrorCode::InternalUnexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineError, ErrorCode};
    use crate::registry::RegistryError;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::AssociationNotFound,
            ErrorCode::ItemNotFound,
            ErrorCode::DuplicateId,
            ErrorCode::RegistryUnavailable,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::DuplicateId.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn engine_errors_map_to_catalog_codes() {
        let err = EngineError::Conflict {
            id: "A1".to_string(),
        };
        assert_eq!(err.error_code(), ErrorCode::DuplicateId);

        let err = EngineError::Registry(RegistryError::Unavailable {
            reason: "connection refused".to_string(),
        });
        assert_eq!(err.error_code(), ErrorCode::RegistryUnavailable);
        assert!(err.to_string().contains("connection refused"));
    }
}
