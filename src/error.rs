//! # Error Handling
//!
//! This module provides the error types for Venture Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                      │
//! │  │                                                                      │
//! │  ├── Auth Errors                                                        │
//! │  │   ├── InvalidCredentials   - Email/password rejected                 │
//! │  │   ├── EmailInUse           - Account already exists for email        │
//! │  │   ├── ProviderUnreachable  - Identity provider network failure       │
//! │  │   ├── PopupClosed          - Provider sign-in dismissed by user      │
//! │  │   └── SignOutTimeout       - Sign-out exceeded the 10s deadline      │
//! │  │                                                                      │
//! │  ├── Profile Errors                                                     │
//! │  │   ├── ProfileValidation    - Record rejected at the boundary         │
//! │  │   ├── ProfileRead          - Failed reading a profile record         │
//! │  │   ├── ProfileWrite         - Failed writing a profile record         │
//! │  │   ├── UnknownRole          - Unrecognized role string                │
//! │  │   └── UnknownDomain        - Unrecognized domain category            │
//! │  │                                                                      │
//! │  ├── Storage Errors                                                     │
//! │  │   ├── StorageRead          - Failed to read from the store           │
//! │  │   ├── StorageWrite         - Failed to write to the store            │
//! │  │   └── StorageNotFound      - Record not found at path                │
//! │  │                                                                      │
//! │  └── Session Errors                                                     │
//! │      ├── NoIdentity           - Operation requires a signed-in user     │
//! │      └── RoleNotChosen        - Operation requires a chosen role        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every asynchronous failure is caught at its call site and converted into
//! a user-visible message; nothing in this crate propagates as a crash of
//! the surrounding shell. A `ProfileRead` failure during the onboarding
//! completeness check degrades to "not completed" rather than blocking
//! access.

use thiserror::Error;

/// Result type alias for Venture Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Venture Core
///
/// All errors are categorized by module/domain to make error handling
/// clearer and to provide meaningful error messages to users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Auth Errors (200-299)
    // ========================================================================

    /// Email/password pair rejected by the identity provider
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// An account already exists for this email
    #[error("An account already exists for {0}.")]
    EmailInUse(String),

    /// Identity provider could not be reached
    #[error("Identity provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// Provider sign-in window was closed before completing
    #[error("Sign-in was cancelled before completing.")]
    PopupClosed,

    /// Sign-out did not complete within the deadline
    ///
    /// Local session state has already been cleared when this is returned;
    /// the caller must force a full reload to the auth view.
    #[error("Sign-out timed out. Please reload the page.")]
    SignOutTimeout,

    // ========================================================================
    // Profile Errors (300-399)
    // ========================================================================

    /// Profile record rejected by boundary validation
    #[error("Invalid profile: {0}")]
    ProfileValidation(String),

    /// Failed to read a profile record
    #[error("Failed to read profile: {0}")]
    ProfileRead(String),

    /// Failed to write a profile record
    ///
    /// When this follows a successful identity creation, the identity exists
    /// without a record; the route guard treats that user as needing role
    /// re-selection on next sign-in.
    #[error("Failed to save profile: {0}")]
    ProfileWrite(String),

    /// Unrecognized role string
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Unrecognized domain category
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    // ========================================================================
    // Storage Errors (400-499)
    // ========================================================================

    /// Failed to read from the profile store
    #[error("Failed to read from storage: {0}")]
    StorageRead(String),

    /// Failed to write to the profile store
    #[error("Failed to write to storage: {0}")]
    StorageWrite(String),

    /// No record at the given path
    #[error("Record not found: {0}")]
    StorageNotFound(String),

    // ========================================================================
    // Session Errors (500-599)
    // ========================================================================

    /// Operation requires a signed-in identity
    #[error("No user is signed in.")]
    NoIdentity,

    /// Operation requires a role to have been chosen
    #[error("No role has been chosen yet.")]
    RoleNotChosen,

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 200-299: Auth
    /// - 300-399: Profile
    /// - 400-499: Storage
    /// - 500-599: Session
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Auth (200-299)
            Error::InvalidCredentials => 200,
            Error::EmailInUse(_) => 201,
            Error::ProviderUnreachable(_) => 202,
            Error::PopupClosed => 203,
            Error::SignOutTimeout => 204,

            // Profile (300-399)
            Error::ProfileValidation(_) => 300,
            Error::ProfileRead(_) => 301,
            Error::ProfileWrite(_) => 302,
            Error::UnknownRole(_) => 303,
            Error::UnknownDomain(_) => 304,

            // Storage (400-499)
            Error::StorageRead(_) => 400,
            Error::StorageWrite(_) => 401,
            Error::StorageNotFound(_) => 402,

            // Session (500-599)
            Error::NoIdentity => 500,
            Error::RoleNotChosen => 501,

            // Internal (900-999)
            Error::Serialization(_) => 900,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors can potentially be resolved by retrying
    /// or by user action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ProviderUnreachable(_)
                | Error::SignOutTimeout
                | Error::PopupClosed
                | Error::ProfileRead(_)
                | Error::ProfileWrite(_)
                | Error::StorageRead(_)
                | Error::StorageWrite(_)
        )
    }

    /// Check if this error requires user action
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials
                | Error::EmailInUse(_)
                | Error::ProfileValidation(_)
                | Error::RoleNotChosen
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidCredentials.code(), 200);
        assert_eq!(Error::SignOutTimeout.code(), 204);
        assert_eq!(Error::ProfileValidation("test".into()).code(), 300);
        assert_eq!(Error::StorageRead("test".into()).code(), 400);
        assert_eq!(Error::NoIdentity.code(), 500);
        assert_eq!(Error::Serialization("test".into()).code(), 900);
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::ProviderUnreachable("down".into()).is_recoverable());
        assert!(Error::SignOutTimeout.is_recoverable());
        assert!(!Error::InvalidCredentials.is_recoverable());
        assert!(!Error::RoleNotChosen.is_recoverable());
    }

    #[test]
    fn test_user_action_errors() {
        assert!(Error::InvalidCredentials.requires_user_action());
        assert!(Error::ProfileValidation("missing name".into()).requires_user_action());
        assert!(!Error::SignOutTimeout.requires_user_action());
    }
}
