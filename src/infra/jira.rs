use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::Value;

use crate::config::sanitize_url;
use crate::domain::issue::Issue;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RESULTS: &str = "50";
const SEARCH_FIELDS: &str = "summary,description,status,assignee,issuetype,priority";
const ATLASSIAN_TOKEN: &str = "X-Atlassian-Token";

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    username: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(
        base_url: Option<String>,
        username: Option<String>,
        token: Option<String>,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::IssueTracker(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.map(|url| sanitize_url(&url)),
            username,
            token,
        })
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira URL not configured".to_string()))?;
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira username not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, username, token))
    }

    fn auth_header(username: &str, token: &str) -> String {
        let credentials = format!("{username}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn search_endpoint(base_url: &str) -> String {
        format!("{base_url}/rest/api/2/search")
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{base_url}/browse/{key}")
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn search(&self, jql: &str) -> AppResult<Vec<Issue>> {
        let (base_url, username, token) = self.api_details()?;
        log::debug!("Jira search: GET {} jql={jql}", Self::search_endpoint(base_url));

        let response = self
            .http
            .get(Self::search_endpoint(base_url))
            .query(&[
                ("jql", jql),
                ("startAt", "0"),
                ("maxResults", MAX_RESULTS),
                ("fields", SEARCH_FIELDS),
            ])
            .header(AUTHORIZATION, Self::auth_header(username, token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(ATLASSIAN_TOKEN, "no-check")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to read Jira response: {err}")))?;

        if !status.is_success() {
            log::error!("Jira search failed for {jql:?}: HTTP {status}, body: {body}");
            return Err(AppError::IssueTracker(error_message(status, &body)));
        }

        if body.trim().is_empty() {
            log::warn!("Jira returned an empty body for {jql:?}");
            return Ok(Vec::new());
        }

        let issues = parse_search_response(&body, base_url)?;
        log::info!("Jira search returned {} issue(s)", issues.len());
        Ok(issues)
    }
}

/// Best-effort extraction of a readable message from a Jira error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!("API request failed: HTTP {}", status.as_u16());
    let payload = match serde_json::from_str::<JiraErrorResponse>(body) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("unable to parse Jira error body: {err}");
            return fallback;
        }
    };

    if let Some(message) = payload.error_messages.into_iter().next() {
        return message;
    }
    payload
        .errors
        .into_iter()
        .next()
        .map(|(_, value)| match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
        .unwrap_or(fallback)
}

/// Parses a search page. Entries that fail to deserialize are logged and
/// dropped so one odd issue cannot hide the rest.
fn parse_search_response(body: &str, base_url: &str) -> AppResult<Vec<Issue>> {
    let payload: JiraSearchResponse = serde_json::from_str(body)
        .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira response: {err}")))?;
    log::debug!(
        "Jira reported {} total issue(s), {} in page",
        payload.total.unwrap_or_default(),
        payload.issues.len()
    );

    let issues = payload
        .issues
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<JiraIssue>(entry) {
            Ok(raw) => Some(raw.into_issue(base_url)),
            Err(err) => {
                log::error!("skipping malformed Jira issue: {err}");
                None
            }
        })
        .collect();
    Ok(issues)
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    issues: Vec<Value>,
}

#[derive(Deserialize)]
struct JiraErrorResponse {
    #[serde(default, rename = "errorMessages")]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: Option<String>,
    description: Option<Value>,
    status: Option<JiraNamed>,
    assignee: Option<JiraUser>,
    issuetype: Option<JiraNamed>,
    priority: Option<JiraNamed>,
}

#[derive(Deserialize)]
struct JiraNamed {
    name: String,
}

#[derive(Deserialize)]
struct JiraUser {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl JiraIssue {
    fn into_issue(self, base_url: &str) -> Issue {
        let fields = self.fields;
        let url = JiraClient::browse_url(base_url, &self.key);
        Issue {
            url: Some(url),
            key: self.key,
            summary: fields.summary,
            // v2 returns plain text; rich-text documents are not rendered.
            description: fields
                .description
                .and_then(|value| value.as_str().map(str::to_string)),
            status: fields.status.map(|status| status.name),
            assignee: fields.assignee.map(|user| user.display_name),
            issue_type: fields.issuetype.map(|kind| kind.name),
            priority: fields.priority.map(|priority| priority.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTH: &str = "Basic dGVzdEB0ZXN0LmNvbTp0ZXN0LXRva2Vu";

    fn client(uri: &str) -> JiraClient {
        JiraClient::new(
            Some(format!("{uri}/")),
            Some("test@test.com".to_string()),
            Some("test-token".to_string()),
        )
        .unwrap()
    }

    fn full_issue(key: &str, summary: &str) -> Value {
        serde_json::json!({
            "id": "10001",
            "key": key,
            "fields": {
                "summary": summary,
                "description": "Steps to reproduce",
                "status": { "id": "1", "name": "In Progress" },
                "assignee": { "displayName": "Test User", "accountId": "42" },
                "issuetype": { "name": "Bug" },
                "priority": { "name": "High" }
            }
        })
    }

    #[tokio::test]
    async fn sends_query_and_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(header("Authorization", AUTH))
            .and(header("X-Atlassian-Token", "no-check"))
            .and(query_param("jql", "project = ABC"))
            .and(query_param("startAt", "0"))
            .and(query_param("maxResults", "50"))
            .and(query_param("fields", SEARCH_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "issues": [full_issue("ABC-1", "Login fails")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let issues = client(&server.uri()).search("project = ABC").await.unwrap();

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.key, "ABC-1");
        assert_eq!(issue.summary.as_deref(), Some("Login fails"));
        assert_eq!(issue.description.as_deref(), Some("Steps to reproduce"));
        assert_eq!(issue.status.as_deref(), Some("In Progress"));
        assert_eq!(issue.assignee.as_deref(), Some("Test User"));
        assert_eq!(issue.issue_type.as_deref(), Some("Bug"));
        assert_eq!(issue.priority.as_deref(), Some("High"));
        assert_eq!(
            issue.url.as_deref(),
            Some(format!("{}/browse/ABC-1", server.uri()).as_str())
        );
    }

    #[tokio::test]
    async fn empty_issue_list_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "startAt": 0,
                "total": 0,
                "issues": []
            })))
            .mount(&server)
            .await;

        let issues = client(&server.uri()).search("project = ABC").await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn blank_body_yields_no_issues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let issues = client(&server.uri()).search("project = ABC").await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn tolerates_missing_fields_and_skips_broken_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issues": [
                    full_issue("ABC-1", "Complete"),
                    { "key": "ABC-2", "fields": { "summary": "No status", "assignee": null } },
                    { "key": "ABC-3" },
                    { "fields": { "summary": "No key" } },
                    full_issue("ABC-4", "Also complete")
                ]
            })))
            .mount(&server)
            .await;

        let issues = client(&server.uri()).search("project = ABC").await.unwrap();
        let keys: Vec<&str> = issues.iter().map(|issue| issue.key.as_str()).collect();
        assert_eq!(keys, vec!["ABC-1", "ABC-2", "ABC-4"]);

        let sparse = &issues[1];
        assert_eq!(sparse.summary.as_deref(), Some("No status"));
        assert_eq!(sparse.status, None);
        assert_eq!(sparse.assignee, None);
        assert_eq!(sparse.description, None);
        assert_eq!(sparse.priority, None);
    }

    #[tokio::test]
    async fn surfaces_error_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errorMessages": ["Field 'summary' does not support searching"],
                "errors": {}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri()).search("bad").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "issue tracker error: Field 'summary' does not support searching"
        );
    }

    #[tokio::test]
    async fn falls_back_to_errors_object_then_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "with-errors"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errorMessages": [],
                "errors": { "jql": "The value 'X' does not exist" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "plain"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
            .mount(&server)
            .await;

        let jira = client(&server.uri());
        let err = jira.search("with-errors").await.unwrap_err();
        assert_eq!(err.to_string(), "issue tracker error: The value 'X' does not exist");

        let err = jira.search("plain").await.unwrap_err();
        assert_eq!(err.to_string(), "issue tracker error: API request failed: HTTP 503");
    }

    #[tokio::test]
    async fn missing_credentials_are_a_configuration_error() {
        let jira = JiraClient::new(Some("https://acme.atlassian.net".to_string()), None, None)
            .unwrap();
        let err = jira.search("project = ABC").await.unwrap_err();
        assert!(err.is_configuration());
    }
}
