use std::time::Duration;

use async_trait::async_trait;
use automation_core::{ActionPoint, AutomationError, Backend, Screen};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::BackendConfig;
use crate::error::HttpError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ActionPointList {
    #[serde(default)]
    items: Vec<ActionPoint>,
}

#[derive(Debug, Serialize)]
struct ViewReport<'a> {
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct PushTokenRequest<'a> {
    push_token: &'a str,
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// [`Backend`] over the automation REST API.
///
/// | Operation | Request |
/// |-----------|---------|
/// | action points | `GET /v1/users/{user}/action-points?type=..&active=..` |
/// | screen | `GET /v1/screens/{id}` |
/// | view report | `POST /v1/screens/{id}/views` |
/// | push token | `POST /v1/users/{user}/push-token` |
pub struct HttpBackend {
    http: Client,
    base: Url,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, HttpError> {
        let base = config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("automation-http/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::Config(format!("base_url '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, HttpError> {
        debug!(url = %url, "GET");
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.config.project_key)
            .query(query)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let envelope: Envelope<T> = resp.json().await?;
        Ok(envelope.data)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<(), HttpError> {
        debug!(url = %url, "POST");
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.config.project_key)
            .json(body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, HttpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(HttpError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn action_points(
        &self,
        kind: &str,
        status: i32,
    ) -> automation_core::Result<Vec<ActionPoint>> {
        let url = self.endpoint(&["v1", "users", self.config.user_id.as_str(), "action-points"])?;
        let query = [("type", kind.to_string()), ("active", status.to_string())];
        let list: ActionPointList = self.get_json(url, &query).await?;
        Ok(list.items)
    }

    async fn screen(&self, screen_id: &str) -> automation_core::Result<Screen> {
        let url = self.endpoint(&["v1", "screens", screen_id])?;
        match self.get_json(url, &[]).await {
            Ok(screen) => Ok(screen),
            Err(HttpError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(AutomationError::ScreenNotFound(screen_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn report_screen_view(&self, screen_id: &str) -> automation_core::Result<()> {
        let url = self.endpoint(&["v1", "screens", screen_id, "views"])?;
        let body = ViewReport {
            user: &self.config.user_id,
        };
        Ok(self.post_json(url, &body).await?)
    }

    async fn register_push_token(&self, token: &str) -> automation_core::Result<()> {
        let url = self.endpoint(&["v1", "users", self.config.user_id.as_str(), "push-token"])?;
        let body = PushTokenRequest { push_token: token };
        Ok(self.post_json(url, &body).await?)
    }
}
