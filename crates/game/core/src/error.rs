//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. `ActionError`, `StatusError`) are defined in
//! their respective modules alongside the operations they validate. This module
//! provides the classification shared by all of them.
//!
//! # Propagation
//!
//! - **Fatal** errors only come from battle setup; the battle cannot start.
//! - Everything else is local to one unit or one action: the engine logs it
//!   and keeps resolving the turn.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: skill on cooldown, target already defeated
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: skill slot index out of range, incomplete action
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: removing a status that is not present
    Internal,

    /// Fatal error - the battle cannot proceed.
    ///
    /// Examples: fewer than two characters, missing catalog entry
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if the battle cannot continue.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleErrorKind: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
