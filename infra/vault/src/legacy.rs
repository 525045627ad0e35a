//! Reader for the plaintext JSON files written before encryption at rest.

use quill_domain::Credential;
use quill_errors::{ErrorCode, QuillError};
use serde::Deserialize;
use std::path::Path;

/// A file whose trimmed content opens a JSON object is a legacy payload.
/// Envelopes are hex and colons only, so the two never overlap.
pub(crate) fn is_legacy(text: &str) -> bool {
    text.trim_start().starts_with('{')
}

/// Only the cookies survive migration; the legacy `timestamp` is replaced by the
/// save time of the encrypted rewrite.
#[derive(Debug, Deserialize)]
pub(crate) struct LegacyPayload {
    #[serde(default)]
    cookies: Option<Vec<LegacyCookie>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCookie {
    name: String,
    value: String,
    domain: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    expires: Option<f64>,
    #[serde(default)]
    http_only: Option<bool>,
    #[serde(default)]
    secure: Option<bool>,
}

impl From<LegacyCookie> for Credential {
    fn from(cookie: LegacyCookie) -> Self {
        Self {
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            expires_at: cookie.expires,
            http_only: cookie.http_only,
            secure: cookie.secure,
        }
    }
}

impl LegacyPayload {
    /// # Errors
    /// [`ErrorCode::AuthCookieInvalid`] when `text` is not a legacy payload.
    pub(crate) fn parse(text: &str, path: &Path) -> Result<Self, QuillError> {
        serde_json::from_str(text).map_err(|e| {
            QuillError::credential(ErrorCode::AuthCookieInvalid)
                .with_message("Legacy credential file is not valid JSON")
                .with_context("filePath", path.display().to_string())
                .with_cause(e)
        })
    }

    pub(crate) fn into_credentials(self) -> Vec<Credential> {
        self.cookies.unwrap_or_default().into_iter().map(Credential::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_objects_only() {
        assert!(is_legacy("{\"cookies\":[]}"));
        assert!(is_legacy("  \n\t{ }"));
        assert!(!is_legacy("00ff:00ff:00ff"));
        assert!(!is_legacy("[]"));
        assert!(!is_legacy(""));
    }

    #[test]
    fn maps_legacy_fields() {
        let text = r#"{
            "cookies": [
                {"name": "sid", "value": "abc", "domain": ".example.com", "path": "/",
                 "expires": 1700000000.5, "httpOnly": true, "secure": false, "sameSite": "Lax"}
            ],
            "timestamp": 1700000000000
        }"#;

        let credentials =
            LegacyPayload::parse(text, Path::new("creds.json")).unwrap().into_credentials();

        assert_eq!(credentials.len(), 1);
        let credential = &credentials[0];
        assert_eq!(credential.name, "sid");
        assert_eq!(credential.expires_at, Some(1_700_000_000.5));
        assert_eq!(credential.http_only, Some(true));
    }

    #[test]
    fn missing_or_null_cookies_are_empty() {
        for text in ["{}", r#"{"cookies": null, "timestamp": 1700000000000}"#] {
            let payload = LegacyPayload::parse(text, Path::new("creds.json")).unwrap();
            assert!(payload.into_credentials().is_empty(), "{text}");
        }
    }

    #[test]
    fn invalid_json_is_a_credential_error() {
        let err = LegacyPayload::parse("{ not json", Path::new("creds.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AuthCookieInvalid);
        assert!(!err.retryable());
        assert_eq!(err.context()["filePath"], "creds.json");
    }
}
