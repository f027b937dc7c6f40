//! OAuth credential for the issue tracker

use serde::{Deserialize, Serialize};

/// Access/refresh token pair (Entity)
///
/// Replaced wholesale on every exchange or refresh, never patched field by
/// field. Expiry is implicit: the tracker rejects a stale access token and
/// the caller refreshes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: None,
            expires_in: None,
            scope: None,
        }
    }

    /// Both tokens are present
    pub fn is_complete(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.refresh_token.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// A request to the tracker's token endpoint
#[derive(Clone, PartialEq, Eq)]
pub enum OAuthGrant {
    AuthorizationCode { code: String },
    RefreshToken { refresh_token: String },
}

impl OAuthGrant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            OAuthGrant::AuthorizationCode { .. } => "authorization_code",
            OAuthGrant::RefreshToken { .. } => "refresh_token",
        }
    }
}

impl std::fmt::Debug for OAuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OAuthGrant({})", self.grant_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_token_response() {
        let json = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "scope": "read:jira-work offline_access",
            "token_type": "Bearer"
        }"#;
        let credential: Credential = serde_json::from_str(json).unwrap();
        assert_eq!(credential.access_token, "at");
        assert_eq!(credential.expires_in, Some(3600));
        assert!(credential.is_complete());
    }

    #[test]
    fn test_error_body_is_not_a_credential() {
        let json = r#"{"error": "invalid_grant", "error_description": "bad code"}"#;
        assert!(serde_json::from_str::<Credential>(json).is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let rendered = format!("{:?}", Credential::new("secret-access", "secret-refresh"));
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }

    #[test]
    fn test_grant_type() {
        let code = OAuthGrant::AuthorizationCode {
            code: "c".to_string(),
        };
        let refresh = OAuthGrant::RefreshToken {
            refresh_token: "r".to_string(),
        };
        assert_eq!(code.grant_type(), "authorization_code");
        assert_eq!(refresh.grant_type(), "refresh_token");
    }
}
