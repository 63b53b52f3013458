//! Error types for battle setup and the phase machine.

use crate::catalog::CatalogError;
use crate::error::{BattleErrorKind, ErrorSeverity};

/// Reasons a battle cannot start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a battle needs at least {min} characters, got {found}")]
    TooFewCharacters { found: usize, min: usize },

    #[error("a battle allows at most {max} characters, got {found}")]
    TooManyCharacters { found: usize, max: usize },

    #[error("{character}'s party has {size} slots, limit is {max}")]
    PartyTooLarge {
        character: String,
        size: usize,
        max: usize,
    },

    #[error("{character} has no units")]
    EmptyParty { character: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BattleErrorKind for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewCharacters { .. } => "SETUP_TOO_FEW_CHARACTERS",
            Self::TooManyCharacters { .. } => "SETUP_TOO_MANY_CHARACTERS",
            Self::PartyTooLarge { .. } => "SETUP_PARTY_TOO_LARGE",
            Self::EmptyParty { .. } => "SETUP_EMPTY_PARTY",
            Self::Catalog(inner) => inner.error_code(),
        }
    }
}

/// Errors surfaced by [`Battle::advance`](super::Battle::advance).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("battle setup failed: {0}")]
    Setup(#[from] SetupError),
}

impl BattleErrorKind for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(inner) => inner.error_code(),
        }
    }
}
