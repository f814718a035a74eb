//! Outbound calls to resource services.

use std::sync::{Arc, RwLock};

use bazaar_core::Envelope;

/// Holds the raw bearer token between requests, separate from the derived
/// cookie identity. Cleared on logout.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(token.into());
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().ok()?.clone()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: ApiMethod::Post,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn put(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: ApiMethod::Put,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: ApiMethod::Delete,
            url: url.into(),
            body: None,
        }
    }
}

/// Sends requests to backend services, attaching the stored bearer token
/// when asked, and always hands back an [`Envelope`] — transport faults are
/// summarized into failure envelopes, never propagated raw.
#[derive(Debug, Clone)]
pub struct OutboundDispatcher {
    client: reqwest::Client,
    tokens: Arc<TokenStore>,
}

impl OutboundDispatcher {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub async fn send(&self, request: ApiRequest, requires_auth: bool) -> Envelope {
        let mut builder = match request.method {
            ApiMethod::Get => self.client.get(&request.url),
            ApiMethod::Post => self.client.post(&request.url),
            ApiMethod::Put => self.client.put(&request.url),
            ApiMethod::Delete => self.client.delete(&request.url),
        };

        if requires_auth {
            if let Some(token) = self.tokens.get() {
                builder = builder.bearer_auth(token);
            }
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                match response.json::<Envelope>().await {
                    Ok(envelope) => envelope,
                    // 401/403 gates respond without a body; anything else
                    // non-envelope is equally a failed call to the caller.
                    Err(_) => Envelope::fail(format!("request failed: {status}")),
                }
            }
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "outbound call failed");
                Envelope::fail(format!("transport failure: {e}"))
            }
        }
    }
}
