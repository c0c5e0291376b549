//! HTTP client wrapper for 123pan API requests.

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{redirect, Client};
use serde_json::Value;

use crate::api::ClientConfig;
use crate::error::{PanError, Result};

/// HTTP client for making requests to 123pan servers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    /// Same settings, but never follows redirects.
    no_redirect: Client,
}

impl HttpClient {
    /// Create a new HTTP client from a configuration.
    ///
    /// Fails when the proxy URL cannot be parsed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build(config, redirect::Policy::default())?,
            no_redirect: build(config, redirect::Policy::none())?,
        })
    }

    /// POST a JSON body and decode the JSON reply.
    pub async fn post_json(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// GET with query parameters and decode the JSON reply.
    pub async fn get_json(
        &self,
        url: &str,
        headers: &HeaderMap,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// PUT raw bytes to a presigned URL.
    pub async fn put_bytes(&self, url: &str, data: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .put(url)
            .body(data)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(PanError::InvalidResponse(format!(
                "HTTP {} from part upload",
                response.status().as_u16()
            )));
        }
        Ok(())
    }

    /// GET without following redirects.
    ///
    /// # Returns
    /// The `Location` header if any, and the response body
    pub async fn get_unfollowed(&self, url: &str) -> Result<(Option<String>, String)> {
        let response = self.no_redirect.get(url).send().await.map_err(transport)?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(transport)?;
        Ok((location, body))
    }
}

fn build(config: &ClientConfig, policy: redirect::Policy) -> Result<Client> {
    let mut builder = Client::builder().timeout(config.timeout).redirect(policy);
    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }
    Ok(builder.build()?)
}

async fn decode(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(PanError::InvalidResponse(format!(
            "HTTP {}",
            status.as_u16()
        ))),
        Err(e) => Err(e.into()),
    }
}

fn transport(e: reqwest::Error) -> PanError {
    if e.is_timeout() {
        PanError::Timeout
    } else {
        PanError::Request(e)
    }
}
