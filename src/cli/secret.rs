//! Secret commands.

use crate::cli::SecretAction;
use crate::core::secrets::{self, NewSecret};
use crate::core::session::Session;
use crate::error::Result;

/// Execute a secret sub-command.
pub fn execute(action: SecretAction, session: &Session) -> Result<()> {
    match action {
        SecretAction::List { limit, offset } => cmd_list(session, limit, offset),
        SecretAction::Get { secret } => cmd_get(session, &secret),
        SecretAction::Store {
            name,
            payload,
            payload_content_type,
            payload_content_encoding,
            algorithm,
            bit_length,
            cypher_type,
            expiration,
        } => cmd_store(
            session,
            NewSecret {
                name,
                payload,
                payload_content_type: Some(payload_content_type),
                payload_content_encoding,
                algorithm: Some(algorithm),
                bit_length: Some(bit_length),
                cypher_type: Some(cypher_type),
                expiration,
            },
        ),
        SecretAction::Delete { secret } => cmd_delete(session, &secret),
    }
}

/// List stored secrets.
fn cmd_list(session: &Session, limit: Option<u32>, offset: Option<u32>) -> Result<()> {
    let page = secrets::list(session, limit, offset)?;

    if page.secrets.is_empty() {
        println!("no secrets stored");
        return Ok(());
    }
    for secret in &page.secrets {
        println!("{}", secret);
    }

    Ok(())
}

/// Show one secret.
fn cmd_get(session: &Session, secret: &str) -> Result<()> {
    let secret = secrets::get(session, secret)?;
    println!("{}", secret);
    Ok(())
}

/// Store a new secret.
fn cmd_store(session: &Session, secret: NewSecret) -> Result<()> {
    let secret_ref = secrets::store(session, &secret)?;
    println!("stored: {}", secret_ref);
    Ok(())
}

/// Delete a secret.
fn cmd_delete(session: &Session, secret: &str) -> Result<()> {
    let id = secrets::delete(session, secret)?;
    println!("deleted: {}", id);
    Ok(())
}
