//! Command-line interface.

pub mod secret;

use clap::{Args, Parser, Subcommand};

use crate::core::session::Session;

/// Command-line interface to the Barbican key management service.
#[derive(Parser)]
#[command(
    name = "barbican",
    about = "Command-line interface to the Barbican key management service",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Credential and connection options, accepted before or after the
/// sub-command. Each takes its value from the flag when given, else from
/// the named environment variable.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Do not use authentication
    #[arg(long, short = 'N', global = true)]
    pub no_auth: bool,

    /// Identity service URL
    #[arg(
        long,
        short = 'A',
        global = true,
        env = "OS_AUTH_URL",
        value_name = "auth-url"
    )]
    pub os_auth_url: Option<String>,

    /// User name for authentication
    #[arg(
        long,
        short = 'U',
        global = true,
        env = "OS_USERNAME",
        value_name = "auth-user-name"
    )]
    pub os_username: Option<String>,

    /// User id for authentication
    #[arg(long, global = true, env = "OS_USER_ID", value_name = "auth-user-id")]
    pub os_user_id: Option<String>,

    /// Password for authentication
    #[arg(
        long,
        short = 'P',
        global = true,
        env = "OS_PASSWORD",
        hide_env_values = true,
        value_name = "auth-password"
    )]
    pub os_password: Option<String>,

    /// Domain id of the user
    #[arg(
        long,
        global = true,
        env = "OS_USER_DOMAIN_ID",
        value_name = "auth-user-domain-id"
    )]
    pub os_user_domain_id: Option<String>,

    /// Domain name of the user
    #[arg(
        long,
        global = true,
        env = "OS_USER_DOMAIN_NAME",
        value_name = "auth-user-domain-name"
    )]
    pub os_user_domain_name: Option<String>,

    /// Tenant name
    #[arg(
        long,
        short = 'T',
        global = true,
        env = "OS_TENANT_NAME",
        value_name = "auth-tenant-name"
    )]
    pub os_tenant_name: Option<String>,

    /// Tenant id
    #[arg(
        long,
        short = 'I',
        global = true,
        env = "OS_TENANT_ID",
        value_name = "tenant-id"
    )]
    pub os_tenant_id: Option<String>,

    /// Another way to specify tenant id
    #[arg(
        long,
        global = true,
        env = "OS_PROJECT_ID",
        value_name = "auth-project-id"
    )]
    pub os_project_id: Option<String>,

    /// Another way to specify tenant name
    #[arg(
        long,
        global = true,
        env = "OS_PROJECT_NAME",
        value_name = "auth-project-name"
    )]
    pub os_project_name: Option<String>,

    /// Domain id of the project
    #[arg(
        long,
        global = true,
        env = "OS_PROJECT_DOMAIN_ID",
        value_name = "auth-project-domain-id"
    )]
    pub os_project_domain_id: Option<String>,

    /// Domain name of the project
    #[arg(
        long,
        global = true,
        env = "OS_PROJECT_DOMAIN_NAME",
        value_name = "auth-project-domain-name"
    )]
    pub os_project_domain_name: Option<String>,

    /// Barbican service URL
    #[arg(
        long,
        short = 'E',
        global = true,
        env = "BARBICAN_ENDPOINT",
        value_name = "barbican-url"
    )]
    pub endpoint: Option<String>,

    /// Allow "insecure" TLS requests without certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Operate on stored secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

/// Secret subcommands.
#[derive(Subcommand)]
pub enum SecretAction {
    /// List stored secrets
    List {
        /// Maximum number of secrets to return
        #[arg(long)]
        limit: Option<u32>,

        /// Number of secrets to skip
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show a single secret
    Get {
        /// Secret id or full reference URL
        secret: String,
    },

    /// Store a new secret
    Store {
        /// Human-readable name
        #[arg(long)]
        name: Option<String>,

        /// Secret payload
        #[arg(long)]
        payload: Option<String>,

        /// Payload content type
        #[arg(long, default_value = "text/plain")]
        payload_content_type: String,

        /// Payload content encoding, for binary content types
        #[arg(long)]
        payload_content_encoding: Option<String>,

        /// Encryption algorithm
        #[arg(long, default_value = "aes")]
        algorithm: String,

        /// Key length in bits
        #[arg(long, default_value_t = 256)]
        bit_length: u32,

        /// Cipher mode
        #[arg(long, default_value = "cbc")]
        cypher_type: String,

        /// Expiration timestamp (ISO 8601)
        #[arg(long)]
        expiration: Option<String>,
    },

    /// Delete a secret
    Delete {
        /// Secret id or full reference URL
        secret: String,
    },
}

/// Execute a command against an established session.
pub fn execute(command: Command, session: &Session) -> crate::error::Result<()> {
    match command {
        Command::Secret { action } => secret::execute(action, session),
    }
}
