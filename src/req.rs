use reqwest::{header::AUTHORIZATION, Client, Method, Response};
use tracing::debug;

use crate::{prelude::*, BaseUrl, Credentials, Error};

/// Thin REST transport shared by all services.
///
/// Stateless per call; every request either carries the Basic-auth header
/// (admin routes) or goes out unauthenticated (public routes). There is no
/// automatic retry: a failed request surfaces immediately and the caller
/// decides what to do.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base: &BaseUrl) -> Self {
        Self {
            client: Client::new(),
            base_url: base.rest_url(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and return `(status, body)` without interpreting the
    /// status code. Used by callers that treat specific non-200 codes as
    /// meaningful (e.g. login's 401).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        credentials: Option<&Credentials>,
        body: Option<String>,
    ) -> Result<(u16, String)> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);
        if let Some(credentials) = credentials {
            request = request.header(AUTHORIZATION, credentials.basic_auth());
        }
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        let response: Response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok((status, text))
    }

    /// Send a request and return the body, treating any status other than
    /// 200 as an error carrying the numeric code.
    pub async fn expect_ok(
        &self,
        method: Method,
        path: &str,
        credentials: Option<&Credentials>,
        body: Option<String>,
    ) -> Result<String> {
        let (status, text) = self.send(method, path, credentials, body).await?;
        if status != 200 {
            return Err(Error::UnexpectedStatus { status });
        }
        Ok(text)
    }

    pub async fn get(&self, path: &str, credentials: Option<&Credentials>) -> Result<String> {
        self.expect_ok(Method::GET, path, credentials, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        body: Option<String>,
    ) -> Result<String> {
        self.expect_ok(Method::POST, path, credentials, body).await
    }

    pub async fn patch(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        body: String,
    ) -> Result<String> {
        self.expect_ok(Method::PATCH, path, credentials, Some(body))
            .await
    }

    /// PUT a raw binary body (image uploads).
    pub async fn put_bytes(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, len = bytes.len(), "uploading binary body");

        let mut request = self.client.put(&url).body(bytes);
        if let Some(credentials) = credentials {
            request = request.header(AUTHORIZATION, credentials.basic_auth());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        if status != 200 {
            return Err(Error::UnexpectedStatus { status });
        }
        Ok(text)
    }

    pub async fn delete(&self, path: &str, credentials: Option<&Credentials>) -> Result<String> {
        self.expect_ok(Method::DELETE, path, credentials, None)
            .await
    }
}
