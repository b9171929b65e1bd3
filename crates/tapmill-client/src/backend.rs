//! Game backend HTTP client
//!
//! All calls are JSON over HTTPS against the clicker backend. The bearer
//! token is per-client state, replaced atomically on every successful login;
//! there is no shared header map between identities.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tapmill_core::{AuthPayload, BoostStatus, LoginResponse, Result, TapError, UserState};
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://clicker-backend.tma.top";

const PROXY_PROBE_URL: &str = "https://httpbin.org/ip";
const PROXY_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Game backend interface the engine runs against
#[async_trait]
pub trait GameBackend: Send + Sync {
    /// Exchange the auth payload for a bearer token and initial state
    async fn game_start(&self, payload: &AuthPayload) -> Result<LoginResponse>;

    /// Idempotent onboarding completion call
    async fn complete_onboarding(&self) -> Result<()>;

    /// Current user state snapshot
    async fn balance(&self) -> Result<UserState>;

    /// Daily energy bonus availability
    async fn boost_status(&self) -> Result<BoostStatus>;

    /// Apply the daily energy bonus; `false` means the backend declined
    async fn apply_boost(&self) -> Result<bool>;

    /// Submit a batch of taps
    async fn send_taps(&self, count: u32) -> Result<()>;

    /// Replace the bearer token used by every subsequent call
    fn set_token(&mut self, token: &str);
}

/// reqwest-backed [`GameBackend`], one per identity
pub struct BackendClient {
    identity: String,
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

#[derive(Serialize)]
struct TapRequest {
    #[serde(rename = "tapsCount")]
    taps_count: u32,
}

#[derive(Serialize)]
struct OnboardingRequest {
    is_completed_navigation_onboarding: bool,
}

impl BackendClient {
    /// Create a client for one identity, optionally routed through a proxy
    pub fn new(identity: &str, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| TapError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| TapError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            identity: identity.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
            token: None,
        })
    }

    /// Override the backend base URL (tests, staging)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Informational egress-IP probe through the configured proxy.
    ///
    /// Uses its own short timeout; a failure is logged, never propagated.
    pub async fn check_proxy(&self) {
        let result = self
            .http
            .get(PROXY_PROBE_URL)
            .timeout(PROXY_PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => match response.json::<serde_json::Value>().await {
                Ok(body) => {
                    let ip = body
                        .get("origin")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown");
                    info!("{} | proxy egress IP: {}", self.identity, ip);
                }
                Err(e) => warn!("{} | proxy probe returned junk: {}", self.identity, e),
            },
            Err(e) => warn!("{} | proxy probe failed: {}", self.identity, e),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TapError::BackendStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl GameBackend for BackendClient {
    async fn game_start(&self, payload: &AuthPayload) -> Result<LoginResponse> {
        debug!("{} | POST /game/start", self.identity);

        // Auth fields travel as query parameters, not a JSON body
        let response = self
            .http
            .post(self.url("/game/start"))
            .query(&[
                ("query_id", payload.query_id.as_str()),
                ("user", payload.user.as_str()),
                ("auth_date", &payload.auth_date.to_string()),
                ("signature", payload.signature.as_str()),
                ("hash", payload.hash.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("game/start failed: {}", e)))?;

        let response = self.check_status(response).await?;
        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| TapError::Backend(format!("game/start returned junk: {}", e)))
    }

    async fn complete_onboarding(&self) -> Result<()> {
        debug!("{} | POST /game/completed-onboarding", self.identity);

        let response = self
            .authorized(self.http.post(self.url("/game/completed-onboarding")))
            .json(&OnboardingRequest {
                is_completed_navigation_onboarding: true,
            })
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("completed-onboarding failed: {}", e)))?;

        self.check_status(response).await?;
        Ok(())
    }

    async fn balance(&self) -> Result<UserState> {
        debug!("{} | GET /user/balance", self.identity);

        let response = self
            .authorized(self.http.get(self.url("/user/balance")))
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("balance failed: {}", e)))?;

        let response = self.check_status(response).await?;
        response
            .json::<UserState>()
            .await
            .map_err(|e| TapError::Backend(format!("balance returned junk: {}", e)))
    }

    async fn boost_status(&self) -> Result<BoostStatus> {
        debug!("{} | GET /energy/bonus", self.identity);

        let response = self
            .authorized(self.http.get(self.url("/energy/bonus")))
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("energy/bonus failed: {}", e)))?;

        let response = self.check_status(response).await?;
        response
            .json::<BoostStatus>()
            .await
            .map_err(|e| TapError::Backend(format!("energy/bonus returned junk: {}", e)))
    }

    async fn apply_boost(&self) -> Result<bool> {
        debug!("{} | POST /energy/bonus", self.identity);

        let response = self
            .authorized(self.http.post(self.url("/energy/bonus")))
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("apply bonus failed: {}", e)))?;

        // A non-2xx is a fault like on every other endpoint; `false` is
        // reserved for an in-body decline
        let response = self.check_status(response).await?;
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TapError::Backend(format!("apply bonus returned junk: {}", e)))?;

        Ok(body != serde_json::Value::Bool(false))
    }

    async fn send_taps(&self, count: u32) -> Result<()> {
        debug!("{} | POST /tap ({} taps)", self.identity, count);

        let response = self
            .authorized(self.http.post(self.url("/tap")))
            .json(&TapRequest { taps_count: count })
            .send()
            .await
            .map_err(|e| TapError::Backend(format!("tap failed: {}", e)))?;

        self.check_status(response).await?;
        Ok(())
    }

    fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }
}
