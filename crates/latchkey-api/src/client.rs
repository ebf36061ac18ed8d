// Hand-crafted async HTTP client for the Nuki Web API.
//
// Base URL: https://api.nuki.io
// Auth: `Authorization: Bearer <token>` header

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{LockAction, Smartlock, SmartlockId};

/// Async client for the Nuki Web API.
///
/// One instance per account credential. The bearer token is injected as a
/// sensitive default header at construction and never appears in logs.
/// Each call issues exactly one request -- no internal retries, no caching.
pub struct WebApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WebApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// Fails if the token contains bytes that cannot appear in an HTTP
    /// header, or if the base URL does not parse.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidToken("not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// joins behave.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// Join a relative path (e.g. `"smartlock/17/action/lock"`) onto the
    /// base URL.
    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        Self::handle_empty(resp).await
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::api_error(status, resp).await);
        }

        // 204 carries no body; hand serde an empty JSON document so
        // sequence endpoints decode to an empty result.
        let body = if status == reqwest::StatusCode::NO_CONTENT {
            String::from("[]")
        } else {
            resp.text().await?
        };

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::api_error(status, resp).await)
        }
    }

    async fn api_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            body: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch every smartlock on the account.
    pub async fn list_smartlocks(&self) -> Result<Vec<Smartlock>, Error> {
        self.get("smartlock").await
    }

    /// Fetch a single smartlock. An unknown id yields
    /// [`Error::Api`] with status 404.
    pub async fn get_smartlock(&self, id: SmartlockId) -> Result<Smartlock, Error> {
        self.get(&format!("smartlock/{id}")).await
    }

    // ── Actions ──────────────────────────────────────────────────────
    //
    // All of these return once the vendor has ACCEPTED the command
    // (HTTP 204). The mechanical state change happens afterwards;
    // callers must re-poll to observe it.

    /// Lock the smartlock.
    pub async fn lock(&self, id: SmartlockId) -> Result<(), Error> {
        self.post_empty(&format!("smartlock/{id}/action/lock")).await
    }

    /// Unlock the smartlock.
    pub async fn unlock(&self, id: SmartlockId) -> Result<(), Error> {
        self.post_empty(&format!("smartlock/{id}/action/unlock"))
            .await
    }

    /// Unlatch the smartlock (open the door).
    pub async fn unlatch(&self, id: SmartlockId) -> Result<(), Error> {
        self.post_empty(&format!("smartlock/{id}/action/unlatch"))
            .await
    }

    /// Execute the device-side lock'n'go sequence, optionally unlatching
    /// after the lock phase.
    pub async fn lock_n_go(&self, id: SmartlockId, unlatch: bool) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            action: u8,
        }

        let action = if unlatch {
            LockAction::LockNGoUnlatch
        } else {
            LockAction::LockNGo
        };

        self.post_json(
            &format!("smartlock/{id}/action"),
            &Body {
                action: action.code(),
            },
        )
        .await
    }
}
