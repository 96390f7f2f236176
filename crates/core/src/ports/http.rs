//! HTTP abstraction for posting GraphQL
//! documents and getting back a
//! lightweight result.

use serde_json::Value;

/// Coarse transport failure classes.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum ErrorKind {
  Timeout,
  ConnectionFailure,
  Unexpected
}

#[derive(Debug, Clone)]

pub struct PostResult {
  pub status:     Option<u16>,
  pub body:       Option<Vec<u8>>,
  pub error:      Option<ErrorKind>,
  pub latency_ms: u64
}

impl PostResult {
  pub fn ok(
    status: u16,
    body: impl Into<Vec<u8>>
  ) -> Self {
    Self {
      status:     Some(status),
      body:       Some(body.into()),
      error:      None,
      latency_ms: 0
    }
  }

  pub fn failed(
    kind: ErrorKind
  ) -> Self {
    Self {
      status:     None,
      body:       None,
      error:      Some(kind),
      latency_ms: 0
    }
  }
}

#[async_trait::async_trait]
pub trait GraphqlHttp: Send + Sync {
  async fn post_json(
    &self,
    url: &str,
    payload: &Value
  ) -> PostResult;
}
