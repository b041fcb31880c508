//! Credential bundle resolution and validation.
//!
//! Every invocation builds exactly one [`Credentials`] bundle from the
//! parsed command line, then classifies it as no-auth, Keystone, or
//! invalid before any session is built. Validation is total and performs
//! no I/O, so a bad option set is rejected without touching the network.

use std::fmt;

use crate::cli::GlobalArgs;
use crate::error::AuthError;

/// Authentication options resolved from flags and environment fallbacks.
///
/// Flag values win over environment fallbacks (clap folds the environment
/// in once at parse time). Empty strings are normalized to `None` here so
/// `--os-username ""` behaves exactly like an unset option.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub no_auth: bool,
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_id: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub endpoint: Option<String>,
    pub insecure: bool,
}

/// The single mode a credential bundle resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Talk to the service directly, no identity service involved.
    NoAuth {
        endpoint: String,
        /// Tenant or project id used in request paths.
        tenant_id: String,
        insecure: bool,
    },

    /// Authenticate against Keystone with the full bundle.
    Keystone(Credentials),
}

impl Credentials {
    /// Build a bundle from parsed global arguments.
    pub fn from_args(args: &GlobalArgs) -> Self {
        Self {
            no_auth: args.no_auth,
            auth_url: normalize(&args.os_auth_url),
            username: normalize(&args.os_username),
            user_id: normalize(&args.os_user_id),
            password: normalize(&args.os_password),
            user_domain_id: normalize(&args.os_user_domain_id),
            user_domain_name: normalize(&args.os_user_domain_name),
            tenant_name: normalize(&args.os_tenant_name),
            tenant_id: normalize(&args.os_tenant_id),
            project_id: normalize(&args.os_project_id),
            project_name: normalize(&args.os_project_name),
            project_domain_id: normalize(&args.os_project_domain_id),
            project_domain_name: normalize(&args.os_project_domain_name),
            endpoint: normalize(&args.endpoint),
            insecure: args.insecure,
        }
    }

    /// Classify the bundle as exactly one authentication mode.
    ///
    /// Rules apply in order, first match wins:
    /// 1. `--no-auth` together with `--os-auth-url` is contradictory.
    /// 2. `--no-auth` requires `--endpoint` plus a tenant or project id.
    /// 3. Keystone requires an auth URL, a user (id or name), a password,
    ///    and a scope (tenant or project, by id or name).
    /// 4. Anything else is missing credentials.
    ///
    /// Deterministic: the same bundle always resolves to the same mode.
    pub fn validate(&self) -> Result<AuthMode, AuthError> {
        if self.no_auth && self.auth_url.is_some() {
            return Err(AuthError::MutuallyExclusive);
        }

        if self.no_auth {
            // Tenant id wins when both a tenant and a project id are given.
            let tenant = self.tenant_id.as_ref().or(self.project_id.as_ref());
            return match (self.endpoint.as_ref(), tenant) {
                (Some(endpoint), Some(tenant)) => Ok(AuthMode::NoAuth {
                    endpoint: endpoint.clone(),
                    tenant_id: tenant.clone(),
                    insecure: self.insecure,
                }),
                _ => Err(AuthError::IncompleteNoAuth),
            };
        }

        let has_user = self.user_id.is_some() || self.username.is_some();
        let has_scope = self.tenant_name.is_some()
            || self.tenant_id.is_some()
            || self.project_name.is_some()
            || self.project_id.is_some();

        if self.auth_url.is_some() && has_user && self.password.is_some() && has_scope {
            return Ok(AuthMode::Keystone(self.clone()));
        }

        Err(AuthError::MissingCredentials)
    }

    /// Scope identifier in fixed precedence order: tenant id, project id,
    /// tenant name, project name.
    pub fn scope(&self) -> Option<&str> {
        self.tenant_id
            .as_deref()
            .or(self.project_id.as_deref())
            .or(self.tenant_name.as_deref())
            .or(self.project_name.as_deref())
    }
}

fn normalize(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_owned)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("no_auth", &self.no_auth)
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("user_domain_id", &self.user_domain_id)
            .field("user_domain_name", &self.user_domain_name)
            .field("tenant_name", &self.tenant_name)
            .field("tenant_id", &self.tenant_id)
            .field("project_id", &self.project_id)
            .field("project_name", &self.project_name)
            .field("project_domain_id", &self.project_domain_id)
            .field("project_domain_name", &self.project_domain_name)
            .field("endpoint", &self.endpoint)
            .field("insecure", &self.insecure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn keystone_bundle() -> Credentials {
        Credentials {
            auth_url: some("http://localhost:5000/v3"),
            username: some("barbican"),
            password: some("secret"),
            tenant_name: some("service"),
            ..Credentials::default()
        }
    }

    #[test]
    fn test_no_auth_with_auth_url_rejected() {
        let creds = Credentials {
            no_auth: true,
            auth_url: some("http://localhost:5000/v3"),
            ..Credentials::default()
        };
        assert_eq!(creds.validate(), Err(AuthError::MutuallyExclusive));
    }

    #[test]
    fn test_no_auth_with_auth_url_rejected_even_when_otherwise_complete() {
        // The contradiction is checked before completeness.
        let creds = Credentials {
            no_auth: true,
            auth_url: some("http://localhost:5000/v3"),
            endpoint: some("http://localhost:9311"),
            tenant_id: some("123"),
            ..keystone_bundle()
        };
        assert_eq!(creds.validate(), Err(AuthError::MutuallyExclusive));
    }

    #[test]
    fn test_no_auth_alone_is_incomplete() {
        let creds = Credentials {
            no_auth: true,
            ..Credentials::default()
        };
        assert_eq!(creds.validate(), Err(AuthError::IncompleteNoAuth));
    }

    #[test]
    fn test_no_auth_with_endpoint_only_is_incomplete() {
        let creds = Credentials {
            no_auth: true,
            endpoint: some("http://localhost:9311"),
            ..Credentials::default()
        };
        assert_eq!(creds.validate(), Err(AuthError::IncompleteNoAuth));
    }

    #[test]
    fn test_no_auth_with_tenant_only_is_incomplete() {
        let creds = Credentials {
            no_auth: true,
            tenant_id: some("123"),
            ..Credentials::default()
        };
        assert_eq!(creds.validate(), Err(AuthError::IncompleteNoAuth));

        let creds = Credentials {
            no_auth: true,
            project_id: some("123"),
            ..Credentials::default()
        };
        assert_eq!(creds.validate(), Err(AuthError::IncompleteNoAuth));
    }

    #[test]
    fn test_no_auth_resolves_with_tenant_id() {
        let creds = Credentials {
            no_auth: true,
            endpoint: some("http://localhost:9311"),
            tenant_id: some("123"),
            insecure: true,
            ..Credentials::default()
        };
        assert_eq!(
            creds.validate(),
            Ok(AuthMode::NoAuth {
                endpoint: "http://localhost:9311".to_string(),
                tenant_id: "123".to_string(),
                insecure: true,
            })
        );
    }

    #[test]
    fn test_no_auth_resolves_with_project_id() {
        let creds = Credentials {
            no_auth: true,
            endpoint: some("http://localhost:9311"),
            project_id: some("456"),
            ..Credentials::default()
        };
        assert_eq!(
            creds.validate(),
            Ok(AuthMode::NoAuth {
                endpoint: "http://localhost:9311".to_string(),
                tenant_id: "456".to_string(),
                insecure: false,
            })
        );
    }

    #[test]
    fn test_no_auth_tenant_id_wins_over_project_id() {
        let creds = Credentials {
            no_auth: true,
            endpoint: some("http://localhost:9311"),
            tenant_id: some("tenant"),
            project_id: some("project"),
            ..Credentials::default()
        };
        match creds.validate() {
            Ok(AuthMode::NoAuth { tenant_id, .. }) => assert_eq!(tenant_id, "tenant"),
            other => panic!("expected no-auth mode, got {:?}", other),
        }
    }

    #[test]
    fn test_keystone_resolves_with_username() {
        let creds = keystone_bundle();
        assert_eq!(creds.validate(), Ok(AuthMode::Keystone(creds.clone())));
    }

    #[test]
    fn test_keystone_resolves_with_user_id() {
        let creds = Credentials {
            username: None,
            user_id: some("u-123"),
            ..keystone_bundle()
        };
        assert!(matches!(creds.validate(), Ok(AuthMode::Keystone(_))));
    }

    #[test]
    fn test_keystone_accepts_any_scope_field() {
        for scoped in [
            Credentials {
                tenant_name: some("svc"),
                ..keystone_bundle()
            },
            Credentials {
                tenant_name: None,
                tenant_id: some("123"),
                ..keystone_bundle()
            },
            Credentials {
                tenant_name: None,
                project_name: some("svc"),
                ..keystone_bundle()
            },
            Credentials {
                tenant_name: None,
                project_id: some("123"),
                ..keystone_bundle()
            },
        ] {
            assert!(matches!(scoped.validate(), Ok(AuthMode::Keystone(_))));
        }
    }

    #[test]
    fn test_keystone_missing_auth_url_is_missing_credentials() {
        let creds = Credentials {
            auth_url: None,
            ..keystone_bundle()
        };
        assert_eq!(creds.validate(), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_keystone_missing_user_is_missing_credentials() {
        let creds = Credentials {
            username: None,
            ..keystone_bundle()
        };
        assert_eq!(creds.validate(), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_keystone_missing_password_is_missing_credentials() {
        let creds = Credentials {
            password: None,
            ..keystone_bundle()
        };
        assert_eq!(creds.validate(), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_keystone_missing_scope_is_missing_credentials() {
        let creds = Credentials {
            tenant_name: None,
            ..keystone_bundle()
        };
        assert_eq!(creds.validate(), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_empty_bundle_is_missing_credentials() {
        assert_eq!(
            Credentials::default().validate(),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let bundles = [
            Credentials::default(),
            keystone_bundle(),
            Credentials {
                no_auth: true,
                endpoint: some("http://localhost:9311"),
                tenant_id: some("123"),
                ..Credentials::default()
            },
        ];
        for creds in bundles {
            assert_eq!(creds.validate(), creds.validate());
        }
    }

    #[test]
    fn test_scope_precedence() {
        let creds = Credentials {
            tenant_id: some("tid"),
            project_id: some("pid"),
            tenant_name: some("tname"),
            project_name: some("pname"),
            ..Credentials::default()
        };
        assert_eq!(creds.scope(), Some("tid"));

        let creds = Credentials {
            tenant_id: None,
            ..creds
        };
        assert_eq!(creds.scope(), Some("pid"));

        let creds = Credentials {
            project_id: None,
            ..creds
        };
        assert_eq!(creds.scope(), Some("tname"));

        let creds = Credentials {
            tenant_name: None,
            ..creds
        };
        assert_eq!(creds.scope(), Some("pname"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = keystone_bundle();
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("barbican"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_field() -> impl Strategy<Value = Option<String>> {
            proptest::option::of("[a-z0-9]{1,12}")
        }

        prop_compose! {
            fn arb_credentials()(
                no_auth in any::<bool>(),
                auth_url in arb_field(),
                username in arb_field(),
                user_id in arb_field(),
                password in arb_field(),
                tenant_name in arb_field(),
                tenant_id in arb_field(),
                project_id in arb_field(),
                project_name in arb_field(),
                endpoint in arb_field(),
                insecure in any::<bool>(),
            ) -> Credentials {
                Credentials {
                    no_auth,
                    auth_url,
                    username,
                    user_id,
                    password,
                    tenant_name,
                    tenant_id,
                    project_id,
                    project_name,
                    endpoint,
                    insecure,
                    ..Credentials::default()
                }
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(50))]

            #[test]
            fn validate_is_deterministic(creds in arb_credentials()) {
                prop_assert_eq!(creds.validate(), creds.validate());
            }

            #[test]
            fn conflicting_flags_always_rejected(creds in arb_credentials()) {
                let creds = Credentials {
                    no_auth: true,
                    auth_url: Some("http://localhost:5000".to_string()),
                    ..creds
                };
                prop_assert_eq!(creds.validate(), Err(AuthError::MutuallyExclusive));
            }

            #[test]
            fn complete_no_auth_always_resolves(creds in arb_credentials()) {
                let creds = Credentials {
                    no_auth: true,
                    auth_url: None,
                    endpoint: Some("http://localhost:9311".to_string()),
                    tenant_id: Some("123".to_string()),
                    ..creds
                };
                prop_assert!(
                    matches!(creds.validate(), Ok(AuthMode::NoAuth { .. })),
                    "expected Ok(AuthMode::NoAuth {{ .. }})"
                );
            }

            #[test]
            fn complete_keystone_always_resolves(creds in arb_credentials()) {
                let creds = Credentials {
                    no_auth: false,
                    auth_url: Some("http://localhost:5000".to_string()),
                    username: Some("user".to_string()),
                    password: Some("pass".to_string()),
                    project_name: Some("proj".to_string()),
                    ..creds
                };
                prop_assert!(matches!(creds.validate(), Ok(AuthMode::Keystone(_))));
            }
        }
    }
}
