use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::item::ItemKey;

/// Machine-readable error codes for scripts that drive `lo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ItemNotFound,
    EmptyDescription,
    UnknownLabel,
    UnknownSection,
    CrossSectionMove,
    StoreWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::ItemNotFound => "E2001",
            Self::EmptyDescription => "E2002",
            Self::UnknownLabel => "E2003",
            Self::UnknownSection => "E2004",
            Self::CrossSectionMove => "E2005",
            Self::StoreWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .listo/config.toml and retry."),
            Self::ItemNotFound => Some("Run `lo list` to see existing item keys."),
            Self::EmptyDescription => Some("Provide some non-whitespace text for the item."),
            Self::UnknownLabel => Some("Use one of: red, green, blue, yellow."),
            Self::UnknownSection => Some("Use one of: in-progress, completed."),
            Self::CrossSectionMove => {
                Some("Items can only be reordered within their own section.")
            }
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `lo` process finishes."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading or writing a store file.
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value could not be serialized for persistence.
    #[error("failed to encode value for {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Lock acquisition failed.
    #[error("lock error: {0}")]
    Lock(#[from] crate::lock::LockError),
}

impl StoreError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::StoreWriteFailed,
            Self::Encode { .. } => ErrorCode::InternalUnexpected,
            Self::Lock(err) => err.code(),
        }
    }
}

/// Errors raised by to-do list operations.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("item not found: {0}")]
    NotFound(ItemKey),

    #[error("item description must not be blank")]
    EmptyDescription,

    #[error("items {moved} and {target} are in different sections")]
    CrossSection { moved: ItemKey, target: ItemKey },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ListError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ItemNotFound,
            Self::EmptyDescription => ErrorCode::EmptyDescription,
            Self::CrossSection { .. } => ErrorCode::CrossSectionMove,
            Self::Store(err) => err.code(),
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ListError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::ItemNotFound,
            ErrorCode::EmptyDescription,
            ErrorCode::UnknownLabel,
            ErrorCode::UnknownSection,
            ErrorCode::CrossSectionMove,
            ErrorCode::StoreWriteFailed,
            ErrorCode::LockContention,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn display_is_the_bare_code() {
        assert_eq!(ErrorCode::LockContention.to_string(), "E5002");
        assert_eq!(
            ErrorCode::UnknownLabel.hint(),
            Some("Use one of: red, green, blue, yellow.")
        );
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CrossSectionMove.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn list_errors_map_to_codes() {
        assert_eq!(ListError::NotFound(7).code(), ErrorCode::ItemNotFound);
        assert_eq!(ListError::EmptyDescription.code(), ErrorCode::EmptyDescription);
        assert!(ListError::NotFound(7).hint().is_some());
        assert_eq!(ListError::NotFound(7).to_string(), "item not found: 7");
    }
}
