//! Error types for the barbican CLI.
//!
//! Errors are grouped by the stage that produces them: credential
//! validation, session establishment, and API calls. `main` is the only
//! place a terminal error is turned into process output and an exit code.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Credential bundle validation failures.
///
/// Message wording is part of the CLI contract: scripts grep for these
/// exact strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// `--no-auth` and `--os-auth-url` name contradictory modes.
    #[error("argument --os-auth-url/-A: not allowed with argument --no-auth/-N")]
    MutuallyExclusive,

    /// `--no-auth` was given without the fields it needs.
    #[error("please specify --endpoint and --os-project-id(or --os-tenant-id)")]
    IncompleteNoAuth,

    /// Neither a complete no-auth nor a complete Keystone bundle.
    #[error("please specify authentication credentials")]
    MissingCredentials,
}

/// Session establishment failures.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The identity service rejected or failed the token exchange.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[from] IdentityError),

    /// The HTTP client itself could not be constructed.
    #[error("http client error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures talking to the Keystone identity service.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("identity service response did not include a subject token")]
    MissingToken,

    #[error("no key-manager endpoint in the service catalog (use --endpoint)")]
    NoServiceEndpoint,
}

/// Failures talking to the Barbican API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("unexpected response from server ({status}): {detail}")]
    Unexpected { status: u16, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
