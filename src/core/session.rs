//! API session establishment.
//!
//! Turns a resolved authentication mode into exactly one [`Session`]:
//! either a direct no-auth transport, or a Keystone-authenticated one
//! built from a single token exchange. Establishment happens once per
//! invocation, before any sub-command runs.

use tracing::{debug, warn};

use crate::core::credentials::AuthMode;
use crate::core::keystone::IdentityProvider;
use crate::core::transport::Transport;
use crate::error::{IdentityError, SessionError};

/// An established connection to the key management service.
///
/// Sub-commands borrow it for the life of the process; it is never
/// mutated after construction.
#[derive(Debug)]
pub struct Session {
    /// Base URL of the Barbican service.
    pub endpoint: String,
    /// Tenant or project id used in request paths.
    pub tenant_id: String,
    transport: Transport,
}

impl Session {
    /// Establish a session for the given mode.
    ///
    /// No-auth builds a bare transport and performs no network I/O.
    /// Keystone runs one token exchange through `provider`; a failure
    /// there is terminal, never retried. The endpoint is the explicit
    /// `--endpoint` when given, else the catalog's key-manager entry.
    /// The path scope is the supplied tenant or project id when given,
    /// else the authenticated token's project id.
    pub fn establish(
        mode: AuthMode,
        provider: &dyn IdentityProvider,
    ) -> Result<Session, SessionError> {
        let insecure = match &mode {
            AuthMode::NoAuth { insecure, .. } => *insecure,
            AuthMode::Keystone(credentials) => credentials.insecure,
        };
        if insecure {
            warn!("TLS certificate verification is disabled");
        }

        match mode {
            AuthMode::NoAuth {
                endpoint,
                tenant_id,
                insecure,
            } => {
                debug!("Establishing no-auth session for endpoint: {}", endpoint);
                Ok(Session {
                    endpoint,
                    tenant_id,
                    transport: Transport::unauthenticated(insecure)?,
                })
            }

            AuthMode::Keystone(credentials) => {
                debug!(
                    "Authenticating as scope: {}",
                    credentials.scope().unwrap_or("<none>")
                );
                let token = provider.create_session(&credentials)?;

                let endpoint = credentials
                    .endpoint
                    .clone()
                    .or(token.service_endpoint)
                    .ok_or(SessionError::AuthenticationFailed(
                        IdentityError::NoServiceEndpoint,
                    ))?;

                let tenant_id = credentials
                    .tenant_id
                    .clone()
                    .or_else(|| credentials.project_id.clone())
                    .or(token.project_id)
                    .unwrap_or_default();

                debug!("Session established for endpoint: {}", endpoint);
                Ok(Session {
                    endpoint,
                    tenant_id,
                    transport: Transport::authenticated(token.token, credentials.insecure)?,
                })
            }
        }
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}
