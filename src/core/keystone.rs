//! Keystone identity collaborator.
//!
//! Implements the v3 password flow: one POST to `{auth_url}/v3/auth/tokens`,
//! subject token read from the `X-Subject-Token` response header, scope and
//! service catalog taken from the token body. The session builder consumes
//! this strictly through [`IdentityProvider`], so it can be exercised in
//! tests with a canned provider and no network.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::credentials::Credentials;
use crate::core::transport::first_line;
use crate::error::IdentityError;

/// Response header carrying the issued token.
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Provider of authenticated identity sessions.
pub trait IdentityProvider {
    /// Exchange the bundle's identity fields for a scoped token.
    fn create_session(&self, credentials: &Credentials) -> Result<ScopedToken, IdentityError>;
}

/// Result of a successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedToken {
    /// Subject token, sent as `X-Auth-Token` on API requests.
    pub token: String,
    /// Project the token is scoped to, when the service reports one.
    pub project_id: Option<String>,
    /// Public key-manager endpoint from the service catalog.
    pub service_endpoint: Option<String>,
}

/// Keystone v3 password authentication client.
pub struct KeystoneClient {
    insecure: bool,
}

impl KeystoneClient {
    pub fn new(insecure: bool) -> Self {
        Self { insecure }
    }

    /// Token request URL for an auth URL, appending the version segment
    /// when the URL does not already name one.
    fn tokens_url(auth_url: &str) -> String {
        let base = auth_url.trim_end_matches('/');
        if base.ends_with(&format!("/{}", constants::KEYSTONE_VERSION)) {
            format!("{}/auth/tokens", base)
        } else {
            format!("{}/{}/auth/tokens", base, constants::KEYSTONE_VERSION)
        }
    }
}

impl IdentityProvider for KeystoneClient {
    fn create_session(&self, credentials: &Credentials) -> Result<ScopedToken, IdentityError> {
        let auth_url = credentials.auth_url.as_deref().unwrap_or_default();
        let url = Self::tokens_url(auth_url);
        debug!("Requesting token from: {}", url);

        let http = Client::builder()
            .danger_accept_invalid_certs(self.insecure)
            .timeout(Duration::from_secs(constants::HTTP_TIMEOUT_SECS))
            .build()?;

        let request = TokenRequest::from_credentials(credentials);
        let response = http.post(&url).json(&request).send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = first_line(&response.text().unwrap_or_default());
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(IdentityError::MissingToken)?;

        let body: TokenResponse = response.json()?;
        debug!(
            "Token issued, scoped project: {:?}",
            body.token.project.as_ref().map(|p| p.id.as_str())
        );

        let service_endpoint = body.token.key_manager_endpoint();
        Ok(ScopedToken {
            token,
            project_id: body.token.project.map(|p| p.id),
            service_endpoint,
        })
    }
}

// Wire format of the v3 password grant. Unset fields are omitted from the
// request body rather than sent as null.

#[derive(Debug, Serialize)]
struct TokenRequest {
    auth: Auth,
}

#[derive(Debug, Serialize)]
struct Auth {
    identity: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Scope>,
}

#[derive(Debug, Serialize)]
struct Identity {
    methods: Vec<&'static str>,
    password: Password,
}

#[derive(Debug, Serialize)]
struct Password {
    user: User,
}

#[derive(Debug, Serialize)]
struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<Domain>,
    password: String,
}

#[derive(Debug, Serialize)]
struct Domain {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Scope {
    project: Project,
}

#[derive(Debug, Serialize)]
struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<Domain>,
}

impl TokenRequest {
    fn from_credentials(credentials: &Credentials) -> Self {
        // A user id identifies the user on its own; a user name needs a
        // domain, defaulting to the "default" domain id.
        let user = if let Some(id) = &credentials.user_id {
            User {
                id: Some(id.clone()),
                name: None,
                domain: None,
                password: credentials.password.clone().unwrap_or_default(),
            }
        } else {
            User {
                id: None,
                name: credentials.username.clone(),
                domain: Some(Domain::from_parts(
                    &credentials.user_domain_id,
                    &credentials.user_domain_name,
                )),
                password: credentials.password.clone().unwrap_or_default(),
            }
        };

        // Same rule for the scope: an explicit id wins, a name needs a
        // domain. Tenant fields take precedence over project fields.
        let scope_id = credentials.tenant_id.as_ref().or(credentials.project_id.as_ref());
        let scope = if let Some(id) = scope_id {
            Some(Scope {
                project: Project {
                    id: Some(id.clone()),
                    name: None,
                    domain: None,
                },
            })
        } else {
            credentials
                .tenant_name
                .as_ref()
                .or(credentials.project_name.as_ref())
                .map(|name| Scope {
                    project: Project {
                        id: None,
                        name: Some(name.clone()),
                        domain: Some(Domain::from_parts(
                            &credentials.project_domain_id,
                            &credentials.project_domain_name,
                        )),
                    },
                })
        };

        TokenRequest {
            auth: Auth {
                identity: Identity {
                    methods: vec!["password"],
                    password: Password { user },
                },
                scope,
            },
        }
    }
}

impl Domain {
    fn from_parts(id: &Option<String>, name: &Option<String>) -> Self {
        if id.is_none() && name.is_none() {
            return Domain {
                id: Some(constants::DEFAULT_DOMAIN_ID.to_string()),
                name: None,
            };
        }
        Domain {
            id: id.clone(),
            name: name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    project: Option<ProjectRef>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    url: String,
}

impl TokenBody {
    /// Public key-manager endpoint from the catalog, if registered.
    fn key_manager_endpoint(&self) -> Option<String> {
        self.catalog
            .iter()
            .find(|entry| entry.service_type == constants::KEY_MANAGER_TYPE)
            .and_then(|entry| {
                entry
                    .endpoints
                    .iter()
                    .find(|endpoint| endpoint.interface == constants::PUBLIC_INTERFACE)
                    .map(|endpoint| endpoint.url.clone())
            })
    }
}
