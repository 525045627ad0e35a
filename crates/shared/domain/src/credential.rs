use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One session credential (a browser cookie) captured after login.
///
/// `expires_at` is in epoch seconds, as reported by the browser driver. Drivers report
/// session credentials either without an expiry or with a non-positive one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

/// Identity of a credential within a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    pub name: String,
    pub domain: String,
    pub path: Option<String>,
}

impl Credential {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: None,
            expires_at: None,
            http_only: None,
            secure: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_expires_at(mut self, epoch_seconds: f64) -> Self {
        self.expires_at = Some(epoch_seconds);
        self
    }

    #[must_use]
    pub fn key(&self) -> CredentialKey {
        CredentialKey {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }

    /// Session credentials never expire.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) if expires > 0.0 => expires <= now.timestamp() as f64,
            _ => false,
        }
    }
}

/// The full collection of credentials for one login, stamped with its save time.
///
/// A set is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub credentials: Vec<Credential>,
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

/// `null` reads as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for CredentialSet {
    fn default() -> Self {
        Self { credentials: Vec::new(), saved_at: DateTime::<Utc>::UNIX_EPOCH }
    }
}

impl CredentialSet {
    pub fn new(credentials: Vec<Credential>, saved_at: DateTime<Utc>) -> Self {
        Self { credentials, saved_at }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Credential> {
        self.credentials.iter()
    }

    /// Renders `name=value; name2=value2` in stored order.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.credentials
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The credentials still valid at `now`, in stored order.
    #[must_use]
    pub fn live(&self, now: DateTime<Utc>) -> Vec<&Credential> {
        self.credentials.iter().filter(|c| !c.is_expired(now)).collect()
    }

    /// Collapses duplicate identities: the last occurrence wins, but keeps the position
    /// where the identity was first seen.
    pub fn dedup_by_key(&mut self) {
        let mut positions: HashMap<CredentialKey, usize> = HashMap::new();
        let mut unique: Vec<Credential> = Vec::with_capacity(self.credentials.len());

        for credential in self.credentials.drain(..) {
            if let Some(&idx) = positions.get(&credential.key()) {
                unique[idx] = credential;
            } else {
                positions.insert(credential.key(), unique.len());
                unique.push(credential);
            }
        }

        self.credentials = unique;
    }
}

impl<'a> IntoIterator for &'a CredentialSet {
    type Item = &'a Credential;
    type IntoIter = std::slice::Iter<'a, Credential>;

    fn into_iter(self) -> Self::IntoIter {
        self.credentials.iter()
    }
}
