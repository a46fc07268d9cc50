use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::backend::{Reply, RestBackend};
use crate::config::{ProvisionerConfig, ServiceKey};
use crate::error::BackendError;

/// [`RestBackend`] over the hosted REST API.
///
/// One client per run. The configured timeout covers each request from
/// connect to the end of the body.
pub struct HttpBackend {
    client: Client,
    rest_base: String,
    key: ServiceKey,
}

impl HttpBackend {
    pub fn new(config: &ProvisionerConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            rest_base: config.rest_base(),
            key: config.service_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_base, path))
            .header("apikey", self.key.expose())
            .bearer_auth(self.key.expose())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Reply, BackendError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!("Backend replied {} ({} bytes)", status, body.len());
        Ok(Reply { status, body })
    }
}

impl RestBackend for HttpBackend {
    async fn read_one(&self, table: &str) -> Result<Reply, BackendError> {
        let request = self.request(Method::GET, table).query(&[("limit", "1")]);
        self.send(request).await
    }

    async fn insert(&self, table: &str, row: &Value) -> Result<Reply, BackendError> {
        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row);
        self.send(request).await
    }

    async fn delete_eq(&self, table: &str, column: &str, value: &str) -> Result<Reply, BackendError> {
        let filter = format!("eq.{}", value);
        let request = self.request(Method::DELETE, table).query(&[(column, filter.as_str())]);
        self.send(request).await
    }

    async fn rpc(&self, function: &str, args: &Value) -> Result<Reply, BackendError> {
        let request = self.request(Method::POST, &format!("rpc/{}", function)).json(args);
        self.send(request).await
    }
}
