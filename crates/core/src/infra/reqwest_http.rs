//! Reqwest-backed client implementing the `GraphqlHttp` port; maps reqwest
//! failures into coarse error kinds and leaves status handling to callers.
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::ports::http::{ErrorKind, GraphqlHttp, PostResult};

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(120))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn classify_error(e: &reqwest::Error) -> ErrorKind {
        if e.is_timeout() {
            ErrorKind::Timeout
        } else if e.is_connect() {
            ErrorKind::ConnectionFailure
        } else {
            ErrorKind::Unexpected
        }
    }
}

#[async_trait::async_trait]
impl GraphqlHttp for ReqwestHttp {
    async fn post_json(&self, url: &str, payload: &Value) -> PostResult {
        let start = tokio::time::Instant::now();
        debug!(url, "HTTP POST start");
        match self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(resp) => {
                let status = Some(resp.status().as_u16());
                let body = match resp.bytes().await {
                    Ok(b) => Some(b.to_vec()),
                    Err(e) => {
                        warn!(url, error = %e, "Failed reading body");
                        None
                    }
                };
                let latency_ms = start.elapsed().as_millis() as u64;
                debug!(url, ?status, latency_ms, "HTTP POST done");
                PostResult {
                    status,
                    body,
                    error: None,
                    latency_ms,
                }
            }
            Err(e) => {
                warn!(url, error = %e, "HTTP POST failed");
                let latency_ms = start.elapsed().as_millis() as u64;
                PostResult {
                    status: None,
                    body: None,
                    error: Some(Self::classify_error(&e)),
                    latency_ms,
                }
            }
        }
    }
}
