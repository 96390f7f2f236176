use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::extract::extract_user_stats;
use super::{queries, AniListError};
use crate::domain::model::{StatKey, UserStats};
use crate::ports::http::GraphqlHttp;

pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

#[derive(Debug, Clone)]
pub struct FetchedStats {
    pub user_id: i64,
    pub stats: UserStats,
}

#[derive(Clone)]
pub struct AniListClient {
    http: Arc<dyn GraphqlHttp>,
    endpoint: String,
}

impl AniListClient {
    pub fn new(http: Arc<dyn GraphqlHttp>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_user_id(&self, username: &str) -> Result<i64, AniListError> {
        let data = self
            .post(queries::USER_ID, json!({ "userName": username }), username)
            .await?;
        data.pointer("/User/id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AniListError::MissingData("User.id".into()))
    }

    pub async fn fetch_user_stats(
        &self,
        username: &str,
        keys: &[StatKey],
    ) -> Result<FetchedStats, AniListError> {
        debug!(username, "fetching AniList data");
        let user_id = self.fetch_user_id(username).await?;

        let data = self
            .post(
                queries::USER_STATS,
                json!({ "userName": username, "userId": user_id }),
                username,
            )
            .await?;

        let stats = extract_user_stats(&data, keys).inspect_err(|e| {
            error!(username, error = %e, "AniList response extraction failed");
        })?;
        debug!(username, user_id, keys = keys.len(), "AniList data extracted");

        Ok(FetchedStats { user_id, stats })
    }

    /// Sends one GraphQL document and returns its `data` object.
    async fn post(
        &self,
        query: &str,
        variables: Value,
        username: &str,
    ) -> Result<Value, AniListError> {
        let payload = json!({ "query": query, "variables": variables });
        let result = self.http.post_json(&self.endpoint, &payload).await;

        if let Some(kind) = result.error {
            warn!(username, ?kind, "AniList request failed");
            return Err(AniListError::Transport(kind));
        }

        let status = result.status.unwrap_or_default();
        if status == 429 {
            warn!(username, "AniList rate limit exceeded");
            return Err(AniListError::RateLimited);
        }

        let body = result.body.unwrap_or_default();
        let mut response: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(_) if status == 404 => {
                return Err(AniListError::UserNotFound(username.to_string()));
            }
            Err(_) if !(200..300).contains(&status) => {
                return Err(AniListError::Status(status));
            }
            Err(e) => return Err(AniListError::Decode(e)),
        };

        if is_server_error(&response) {
            warn!(username, status, "AniList reported an internal error");
            return Err(AniListError::ServerError);
        }
        if status == 404 {
            return Err(AniListError::UserNotFound(username.to_string()));
        }
        if !(200..300).contains(&status) {
            warn!(username, status, "AniList returned an error status");
            return Err(AniListError::Status(status));
        }

        let data = response
            .get_mut("data")
            .filter(|d| !d.is_null())
            .map(Value::take)
            .ok_or_else(|| AniListError::MissingData("data".into()))?;

        if data.get("User").is_none_or(Value::is_null) {
            return Err(AniListError::UserNotFound(username.to_string()));
        }

        Ok(data)
    }
}

/// AniList signals transient failures either as a GraphQL error entry or a
/// bare `error` object, both carrying status 500.
fn is_server_error(response: &Value) -> bool {
    let in_errors = response
        .get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| {
            errors.iter().any(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .is_some_and(|m| m.contains("Internal Server Error"))
                    || e.get("status").and_then(Value::as_i64) == Some(500)
            })
        });

    let bare_error = response
        .get("error")
        .and_then(|e| e.get("status"))
        .and_then(Value::as_i64)
        == Some(500);

    in_errors || bare_error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_detected_from_message_or_status() {
        assert!(is_server_error(&json!({
            "errors": [{ "message": "Internal Server Error" }]
        })));
        assert!(is_server_error(&json!({
            "errors": [{ "message": "oops", "status": 500 }]
        })));
        assert!(is_server_error(&json!({ "error": { "status": 500 } })));
        assert!(!is_server_error(&json!({
            "errors": [{ "message": "Not Found.", "status": 404 }]
        })));
    }
}
