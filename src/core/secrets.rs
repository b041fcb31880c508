//! Secret model and API operations.
//!
//! [`Secret`] is a read-only view of the service's JSON representation.
//! The service returns timestamps in two dialects, RFC 3339 and a
//! zone-less legacy form, so parsing accepts both. The operations here
//! are thin wrappers over an established [`Session`].

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::blocking::Response;
use reqwest::{Method, StatusCode};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::core::session::Session;
use crate::core::transport::first_line;
use crate::error::ApiError;

/// A stored secret as described by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    /// Self-referential URL; the only field the service always returns.
    pub secret_ref: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub bit_length: Option<u32>,
    #[serde(default)]
    pub cypher_type: Option<String>,
    #[serde(default)]
    pub payload_content_type: Option<String>,
    #[serde(default)]
    pub payload_content_encoding: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub expiration: Option<DateTime<Utc>>,
}

impl Secret {
    /// Identifier derived from the last path segment of `secret_ref`.
    pub fn id(&self) -> String {
        ref_to_id(&self.secret_ref)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Secret - ID: {}", self.id())?;
        writeln!(f, "         reference: {}", self.secret_ref)?;
        writeln!(f, "         name: {}", display_or_dash(&self.name))?;
        writeln!(f, "         created: {}", display_or_dash(&self.created))?;
        writeln!(f, "         status: {}", display_or_dash(&self.status))?;
        writeln!(f, "         bit length: {}", display_or_dash(&self.bit_length))?;
        writeln!(f, "         algorithm: {}", display_or_dash(&self.algorithm))?;
        writeln!(f, "         cypher type: {}", display_or_dash(&self.cypher_type))?;
        write!(f, "         expiration: {}", display_or_dash(&self.expiration))
    }
}

/// One page of the secret list.
#[derive(Debug, Deserialize)]
pub struct SecretList {
    pub secrets: Vec<Secret>,
    #[serde(default)]
    pub total: u64,
}

/// Fields sent when storing a new secret. Unset fields are omitted from
/// the request body.
#[derive(Debug, Default, Serialize)]
pub struct NewSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cypher_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredRef {
    secret_ref: String,
}

/// List stored secrets.
pub fn list(
    session: &Session,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<SecretList, ApiError> {
    let url = secrets_url(&session.endpoint, &session.tenant_id, None);
    debug!("GET {}", url);

    let mut request = session.transport().request(Method::GET, &url);
    if let Some(limit) = limit {
        request = request.query(&[("limit", limit)]);
    }
    if let Some(offset) = offset {
        request = request.query(&[("offset", offset)]);
    }

    let response = check(request.send()?, None)?;
    Ok(response.json()?)
}

/// Fetch one secret by id or full reference URL.
pub fn get(session: &Session, secret: &str) -> Result<Secret, ApiError> {
    let id = ref_to_id(secret);
    let url = secrets_url(&session.endpoint, &session.tenant_id, Some(&id));
    debug!("GET {}", url);

    let response = session.transport().request(Method::GET, &url).send()?;
    let response = check(response, Some(&id))?;
    Ok(response.json()?)
}

/// Store a new secret, returning its reference URL.
pub fn store(session: &Session, secret: &NewSecret) -> Result<String, ApiError> {
    let url = secrets_url(&session.endpoint, &session.tenant_id, None);
    debug!("POST {}", url);

    let response = session
        .transport()
        .request(Method::POST, &url)
        .json(secret)
        .send()?;
    let response = check(response, None)?;
    let stored: StoredRef = response.json()?;
    Ok(stored.secret_ref)
}

/// Delete a secret by id or full reference URL, returning the deleted id.
pub fn delete(session: &Session, secret: &str) -> Result<String, ApiError> {
    let id = ref_to_id(secret);
    let url = secrets_url(&session.endpoint, &session.tenant_id, Some(&id));
    debug!("DELETE {}", url);

    let response = session.transport().request(Method::DELETE, &url).send()?;
    check(response, Some(&id))?;
    Ok(id)
}

fn secrets_url(endpoint: &str, tenant_id: &str, id: Option<&str>) -> String {
    let base = endpoint.trim_end_matches('/');
    match id {
        Some(id) => format!("{}/{}/secrets/{}", base, tenant_id, id),
        None => format!("{}/{}/secrets", base, tenant_id),
    }
}

/// Last path segment of a reference URL; bare ids pass through unchanged.
fn ref_to_id(reference: &str) -> String {
    Url::parse(reference)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.last().map(str::to_owned))
        })
        .unwrap_or_else(|| reference.to_string())
}

fn check(response: Response, secret_id: Option<&str>) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, secret_id) {
        return Err(ApiError::NotFound(id.to_string()));
    }
    Err(ApiError::Unexpected {
        status: status.as_u16(),
        detail: first_line(&response.text().unwrap_or_default()),
    })
}

fn display_or_dash<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(T::to_string)
        .unwrap_or_else(|| "-".to_string())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(raw) => parse_timestamp(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}
