use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

/// HTTP access to one hospital's API. Every call carries the `code` header.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    hospital_code: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, hospital_code: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            hospital_code: hospital_code.into(),
        }
    }

    pub fn hospital_code(&self) -> &str {
        &self.hospital_code
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("code", &self.hospital_code);
        if let Some(token) = token {
            req = req.header(reqwest::header::AUTHORIZATION, token);
        }
        req
    }

    /// The JSON body whatever the status; error bodies carry `success: false`.
    async fn send(req: RequestBuilder) -> Result<Value> {
        let res = req.send().await.context("request failed")?;
        let status = res.status();
        let body = res
            .json::<Value>()
            .await
            .with_context(|| format!("response with status {status} was not JSON"))?;
        tracing::debug!(%status, "api response");
        Ok(body)
    }

    pub async fn get_json(&self, path: &str, token: Option<&str>) -> Result<Value> {
        Self::send(self.request(Method::GET, path, token)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B, token: Option<&str>) -> Result<Value> {
        Self::send(self.request(Method::POST, path, token).json(body)).await
    }
}

/// `Some(message)` when a body reports failure.
pub fn failure_message(body: &Value) -> Option<String> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return None;
    }
    Some(
        body.get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_string(),
    )
}
