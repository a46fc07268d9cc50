use reqwest::StatusCode;
use serde_json::Value;

use crate::error::BackendError;

/// PostgREST / Postgres error codes meaning "no such relation".
const UNKNOWN_RELATION_CODES: &[&str] = &["42P01", "PGRST205"];

/// Status and raw body of one REST call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `code` field of a JSON error body, if any.
    pub fn error_code(&self) -> Option<String> {
        serde_json::from_str::<Value>(&self.body)
            .ok()?
            .get("code")?
            .as_str()
            .map(str::to_string)
    }
}

/// Result of a bounded read against one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableProbe {
    /// Readable, possibly empty.
    Present,
    /// The backend reported an unknown relation.
    Absent,
    /// Any other status. Not counted as present.
    Undetermined(StatusCode),
}

impl TableProbe {
    pub fn classify(reply: &Reply) -> Self {
        if reply.is_success() {
            return TableProbe::Present;
        }

        let unknown_relation = reply
            .error_code()
            .is_some_and(|code| UNKNOWN_RELATION_CODES.contains(&code.as_str()));

        // 406 is what older gateways answer for a missing table. A bare 404
        // without a relation code usually means the URL is not a REST gateway.
        if unknown_relation || reply.status == StatusCode::NOT_ACCEPTABLE {
            TableProbe::Absent
        } else {
            TableProbe::Undetermined(reply.status)
        }
    }
}

/// The generic data API of the hosted backend.
///
/// Implemented over HTTP by [`crate::http::HttpBackend`]. Calls are awaited
/// one at a time, so implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait RestBackend {
    /// `GET /<table>?limit=1`
    async fn read_one(&self, table: &str) -> Result<Reply, BackendError>;

    /// `POST /<table>` with a JSON row.
    async fn insert(&self, table: &str, row: &Value) -> Result<Reply, BackendError>;

    /// `DELETE /<table>?<column>=eq.<value>`
    async fn delete_eq(&self, table: &str, column: &str, value: &str) -> Result<Reply, BackendError>;

    /// `POST /rpc/<function>` with a JSON argument object.
    async fn rpc(&self, function: &str, args: &Value) -> Result<Reply, BackendError>;
}
