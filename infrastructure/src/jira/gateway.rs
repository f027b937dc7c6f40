//! Jira Cloud gateway (OAuth 2.0 3LO + REST v3)
//!
//! The client secret and tokens are only passed to request bodies and
//! `bearer_auth()`; they are never logged or included in error messages.

use super::error::{JiraError, Result};
use super::types::{
    AccessibleResource, CreatedIssue, TokenRequest, error_message, is_unauthorized_body,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use tracing::debug;
use triage_application::{TrackerError, TrackerGateway};
use triage_domain::{Credential, OAuthGrant, SiteInfo, TicketRecord};

/// Audience requested on the consent screen
const AUDIENCE: &str = "api.atlassian.com";

/// Connection settings for [`JiraGateway`]
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_base: String,
    pub api_base: String,
    pub scopes: Vec<String>,
}

/// Tracker gateway for Jira Cloud
pub struct JiraGateway {
    client: Client,
    settings: JiraSettings,
    authorize_url: Url,
}

impl JiraGateway {
    pub fn new(settings: JiraSettings) -> Result<Self> {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: JiraSettings) -> Result<Self> {
        let authorize = format!("{}/authorize", settings.auth_base.trim_end_matches('/'));
        let authorize_url = Url::parse(&authorize)
            .map_err(|e| JiraError::InvalidUrl(format!("{}: {}", authorize, e)))?;
        Ok(Self {
            client,
            settings,
            authorize_url,
        })
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.auth_base.trim_end_matches('/'), path)
    }

    fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    async fn fetch_token(&self, grant: &OAuthGrant) -> Result<Credential> {
        let body = TokenRequest::new(
            grant,
            &self.settings.client_id,
            &self.settings.client_secret,
            &self.settings.redirect_uri,
        );
        debug!("Requesting token ({})", grant.grant_type());

        let response = self
            .client
            .post(self.auth_endpoint("/oauth/token"))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let value = decode(response).await?;
        serde_json::from_value(value).map_err(|e| JiraError::ParseError(e.to_string()))
    }

    async fn fetch_resources(&self, access_token: &str) -> Result<Vec<SiteInfo>> {
        let response = self
            .client
            .get(self.api_endpoint("/oauth/token/accessible-resources"))
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let value = decode(response).await?;
        let resources: Vec<AccessibleResource> =
            serde_json::from_value(value).map_err(|e| JiraError::ParseError(e.to_string()))?;
        Ok(resources.into_iter().map(SiteInfo::from).collect())
    }

    async fn post_issue(
        &self,
        access_token: &str,
        cloud_id: &str,
        payload: &Value,
    ) -> Result<TicketRecord> {
        let url = self.api_endpoint(&format!("/ex/jira/{}/rest/api/3/issue", cloud_id));
        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .await?;

        let value = decode(response).await?;
        let issue: CreatedIssue =
            serde_json::from_value(value).map_err(|e| JiraError::ParseError(e.to_string()))?;
        Ok(issue.into())
    }
}

/// Decode a JSON response, mapping authorization failures and error statuses.
///
/// A 401 is recognised from the HTTP status or from `code: 401` in the body.
async fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(JiraError::ParseError(e.to_string())),
            Err(_) => Value::String(text),
        }
    };

    if status == StatusCode::UNAUTHORIZED || is_unauthorized_body(&body) {
        return Err(JiraError::Unauthorized);
    }
    if !status.is_success() {
        return Err(JiraError::Status {
            status: status.as_u16(),
            message: match &body {
                Value::String(text) => text.clone(),
                other => error_message(other),
            },
        });
    }
    Ok(body)
}

#[async_trait]
impl TrackerGateway for JiraGateway {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("audience", AUDIENCE)
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("scope", &self.settings.scopes.join(" "))
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("state", state)
            .append_pair("response_type", "code")
            .append_pair("prompt", "consent");
        url.into()
    }

    async fn request_token(
        &self,
        grant: &OAuthGrant,
    ) -> std::result::Result<Credential, TrackerError> {
        Ok(self.fetch_token(grant).await?)
    }

    async fn accessible_resources(
        &self,
        access_token: &str,
    ) -> std::result::Result<Vec<SiteInfo>, TrackerError> {
        Ok(self.fetch_resources(access_token).await?)
    }

    async fn create_issue(
        &self,
        access_token: &str,
        cloud_id: &str,
        payload: &Value,
    ) -> std::result::Result<TicketRecord, TrackerError> {
        Ok(self.post_issue(access_token, cloud_id, payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted Jira endpoints
    #[derive(Default)]
    struct MockJira {
        token_bodies: Mutex<Vec<Value>>,
        issue_responses: Mutex<VecDeque<(StatusCode, Value)>>,
        auth_headers: Mutex<Vec<String>>,
    }

    async fn token(
        State(mock): State<Arc<MockJira>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        mock.token_bodies.lock().unwrap().push(body.clone());
        if body["code"] == "bad" {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "access_denied", "error_description": "Unknown code"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "at-new",
                "refresh_token": "rt-new",
                "expires_in": 3600,
                "scope": "write:jira-work offline_access",
                "token_type": "Bearer"
            })),
        )
    }

    async fn resources(State(mock): State<Arc<MockJira>>, headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        mock.auth_headers.lock().unwrap().push(auth);
        Json(json!([
            {"id": "cloud-1", "url": "https://acme.atlassian.net", "name": "acme", "scopes": []},
            {"id": "cloud-2", "url": "https://other.atlassian.net", "name": "other", "scopes": []}
        ]))
    }

    async fn issue(
        State(mock): State<Arc<MockJira>>,
        Path(cloud_id): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        assert_eq!(cloud_id, "cloud-1");
        assert!(body["fields"]["summary"].is_string());
        mock.issue_responses
            .lock()
            .unwrap()
            .pop_front()
            .map(|(status, body)| (status, Json(body)))
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))))
    }

    async fn spawn(mock: Arc<MockJira>) -> JiraGateway {
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/oauth/token/accessible-resources", get(resources))
            .route("/ex/jira/{cloud_id}/rest/api/3/issue", post(issue))
            .with_state(mock);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        JiraGateway::new(JiraSettings {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://bot.example/jira/oauth/callback".to_string(),
            auth_base: base.clone(),
            api_base: base,
            scopes: vec!["read:jira-work".to_string(), "offline_access".to_string()],
        })
        .unwrap()
    }

    fn payload() -> Value {
        json!({"fields": {"summary": "Moderate"}, "update": {}})
    }

    #[test]
    fn test_authorization_url() {
        let gateway = JiraGateway::new(JiraSettings {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://bot.example/jira/oauth/callback".to_string(),
            auth_base: "https://auth.atlassian.com/".to_string(),
            api_base: "https://api.atlassian.com".to_string(),
            scopes: vec!["read:jira-work".to_string(), "offline_access".to_string()],
        })
        .unwrap();

        let url = Url::parse(&gateway.authorization_url("xyz")).unwrap();
        assert_eq!(url.path(), "/authorize");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("audience".to_string(), "api.atlassian.com".to_string())));
        assert!(query.contains(&(
            "scope".to_string(),
            "read:jira-work offline_access".to_string()
        )));
        assert!(query.contains(&(
            "redirect_uri".to_string(),
            "https://bot.example/jira/oauth/callback".to_string()
        )));
        assert!(query.contains(&("state".to_string(), "xyz".to_string())));
        assert!(query.contains(&("prompt".to_string(), "consent".to_string())));
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn test_invalid_auth_base() {
        let result = JiraGateway::new(JiraSettings {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            auth_base: "not a url".to_string(),
            api_base: String::new(),
            scopes: vec![],
        });
        assert!(matches!(result, Err(JiraError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let mock = Arc::new(MockJira::default());
        let gateway = spawn(mock.clone()).await;

        let credential = gateway
            .request_token(&OAuthGrant::AuthorizationCode {
                code: "good".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(credential.access_token, "at-new");
        assert_eq!(credential.expires_in, Some(3600));
        let sent = &mock.token_bodies.lock().unwrap()[0];
        assert_eq!(sent["grant_type"], "authorization_code");
        assert_eq!(sent["client_secret"], "secret");
        assert_eq!(sent["redirect_uri"], "https://bot.example/jira/oauth/callback");
    }

    #[tokio::test]
    async fn test_rejected_code_is_an_error() {
        let gateway = spawn(Arc::new(MockJira::default())).await;

        let err = gateway
            .request_token(&OAuthGrant::AuthorizationCode {
                code: "bad".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TrackerError::Rejected {
                status: 403,
                message: "Unknown code".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_accessible_resources_uses_bearer_token() {
        let mock = Arc::new(MockJira::default());
        let gateway = spawn(mock.clone()).await;

        let sites = gateway.accessible_resources("at-1").await.unwrap();

        assert_eq!(sites[0], SiteInfo::new("cloud-1", "https://acme.atlassian.net"));
        assert_eq!(sites.len(), 2);
        assert_eq!(mock.auth_headers.lock().unwrap()[0], "Bearer at-1");
    }

    #[tokio::test]
    async fn test_create_issue() {
        let mock = Arc::new(MockJira::default());
        mock.issue_responses.lock().unwrap().push_back((
            StatusCode::CREATED,
            json!({"id": "10001", "key": "OPS-7", "self": "https://api/issue/10001"}),
        ));
        let gateway = spawn(mock).await;

        let ticket = gateway.create_issue("at", "cloud-1", &payload()).await.unwrap();
        assert_eq!(ticket, TicketRecord::new("OPS-7", "https://api/issue/10001"));
    }

    #[tokio::test]
    async fn test_unauthorized_status_and_body() {
        let mock = Arc::new(MockJira::default());
        mock.issue_responses.lock().unwrap().extend([
            (StatusCode::UNAUTHORIZED, json!({"code": 401, "message": "Unauthorized"})),
            (StatusCode::OK, json!({"code": 401, "message": "Unauthorized"})),
        ]);
        let gateway = spawn(mock).await;

        for _ in 0..2 {
            let err = gateway.create_issue("stale", "cloud-1", &payload()).await.unwrap_err();
            assert_eq!(err, TrackerError::Unauthorized);
        }
    }

    #[tokio::test]
    async fn test_validation_failure_is_rejected() {
        let mock = Arc::new(MockJira::default());
        mock.issue_responses.lock().unwrap().push_back((
            StatusCode::BAD_REQUEST,
            json!({"errorMessages": [], "errors": {"project": "project is required"}}),
        ));
        let gateway = spawn(mock).await;

        let err = gateway.create_issue("at", "cloud-1", &payload()).await.unwrap_err();
        assert_eq!(
            err,
            TrackerError::Rejected {
                status: 400,
                message: "project: project is required".to_string()
            }
        );
    }
}
