//! Jira Cloud wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use triage_domain::{OAuthGrant, SiteInfo, TicketRecord};

/// Body of `POST /oauth/token`
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<&'a str>,
}

impl<'a> TokenRequest<'a> {
    pub fn new(
        grant: &'a OAuthGrant,
        client_id: &'a str,
        client_secret: &'a str,
        redirect_uri: &'a str,
    ) -> Self {
        let mut request = Self {
            grant_type: grant.grant_type(),
            client_id,
            client_secret,
            code: None,
            refresh_token: None,
            redirect_uri: None,
        };
        match grant {
            OAuthGrant::AuthorizationCode { code } => {
                request.code = Some(code.as_str());
                request.redirect_uri = Some(redirect_uri);
            }
            OAuthGrant::RefreshToken { refresh_token } => {
                request.refresh_token = Some(refresh_token.as_str());
            }
        }
        request
    }
}

/// One element of `GET /oauth/token/accessible-resources`
#[derive(Debug, Deserialize)]
pub struct AccessibleResource {
    pub id: String,
    pub url: String,
}

impl From<AccessibleResource> for SiteInfo {
    fn from(resource: AccessibleResource) -> Self {
        SiteInfo::new(resource.id, resource.url)
    }
}

/// Successful `POST .../rest/api/3/issue` response
#[derive(Debug, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

impl From<CreatedIssue> for TicketRecord {
    fn from(issue: CreatedIssue) -> Self {
        TicketRecord::new(issue.key, issue.self_url)
    }
}

/// Whether a decoded body reports an authorization failure (`"code": 401`)
pub fn is_unauthorized_body(body: &Value) -> bool {
    body.get("code").and_then(Value::as_u64) == Some(401)
}

/// Human-readable error text from a Jira error body
pub fn error_message(body: &Value) -> String {
    let mut parts: Vec<String> = body
        .get("errorMessages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(errors) = body.get("errors").and_then(Value::as_object) {
        parts.extend(
            errors
                .iter()
                .map(|(field, message)| {
                    format!("{}: {}", field, message.as_str().unwrap_or_default())
                }),
        );
    }

    for key in ["error_description", "message", "error"] {
        if parts.is_empty()
            && let Some(message) = body.get(key).and_then(Value::as_str)
        {
            parts.push(message.to_string());
        }
    }

    if parts.is_empty() {
        body.to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorization_code_request_body() {
        let grant = OAuthGrant::AuthorizationCode {
            code: "abc".to_string(),
        };
        let body =
            serde_json::to_value(TokenRequest::new(&grant, "id", "secret", "https://cb")).unwrap();
        assert_eq!(
            body,
            json!({
                "grant_type": "authorization_code",
                "client_id": "id",
                "client_secret": "secret",
                "code": "abc",
                "redirect_uri": "https://cb",
            })
        );
    }

    #[test]
    fn test_refresh_request_body_has_no_redirect() {
        let grant = OAuthGrant::RefreshToken {
            refresh_token: "rt".to_string(),
        };
        let body =
            serde_json::to_value(TokenRequest::new(&grant, "id", "secret", "https://cb")).unwrap();
        assert_eq!(body["grant_type"], "refresh_token");
        assert_eq!(body["refresh_token"], "rt");
        assert!(body.get("redirect_uri").is_none());
        assert!(body.get("code").is_none());
    }

    #[test]
    fn test_unauthorized_body() {
        assert!(is_unauthorized_body(&json!({"code": 401, "message": "Unauthorized"})));
        assert!(!is_unauthorized_body(&json!({"key": "X"})));
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(
            error_message(&json!({"errorMessages": [], "errors": {"summary": "required"}})),
            "summary: required"
        );
        assert_eq!(error_message(&json!({"errorMessages": ["No project"]})), "No project");
        assert_eq!(
            error_message(&json!({"error": "invalid_grant", "error_description": "expired"})),
            "expired"
        );
    }
}
