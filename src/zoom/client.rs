use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::debug;

use super::{normalize_meeting_id, ZoomApiError, ZoomGateway, ZoomMeeting, ZoomRegistrant};
use crate::workflows::registration::ExternalStatus;

pub const DEFAULT_API_BASE_URL: &str = "https://api.zoom.us/v2";
pub const DEFAULT_OAUTH_URL: &str = "https://zoom.us/oauth/token";

const PAGE_SIZE: u16 = 300;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Server-to-server OAuth app credentials.
#[derive(Clone)]
pub struct ZoomCredentials {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ZoomCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomCredentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

#[derive(Deserialize)]
struct MeetingsPage {
    #[serde(default)]
    meetings: Vec<ZoomMeeting>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl Page for MeetingsPage {
    type Item = ZoomMeeting;

    fn into_parts(self) -> (Vec<ZoomMeeting>, Option<String>) {
        (self.meetings, self.next_page_token)
    }
}

#[derive(Deserialize)]
struct RegistrantsPage {
    #[serde(default)]
    registrants: Vec<ZoomRegistrant>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl Page for RegistrantsPage {
    type Item = ZoomRegistrant;

    fn into_parts(self) -> (Vec<ZoomRegistrant>, Option<String>) {
        (self.registrants, self.next_page_token)
    }
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
    action: &'static str,
    registrants: Vec<RegistrantRef<'a>>,
}

#[derive(Serialize)]
struct RegistrantRef<'a> {
    id: &'a str,
    email: &'a str,
}

/// Blocking Zoom REST client. Each call runs to completion on a private runtime, so
/// callers already inside an async context must move onto a blocking thread first.
pub struct ZoomRestClient {
    http: Client,
    runtime: Runtime,
    credentials: ZoomCredentials,
    api_base_url: String,
    oauth_url: String,
    user_id: String,
    token: Mutex<Option<AccessToken>>,
}

impl ZoomRestClient {
    pub fn new(
        credentials: ZoomCredentials,
        user_id: impl Into<String>,
    ) -> Result<Self, ZoomApiError> {
        Self::with_endpoints(credentials, user_id, DEFAULT_API_BASE_URL, DEFAULT_OAUTH_URL)
    }

    pub fn with_endpoints(
        credentials: ZoomCredentials,
        user_id: impl Into<String>,
        api_base_url: impl Into<String>,
        oauth_url: impl Into<String>,
    ) -> Result<Self, ZoomApiError> {
        let runtime = Runtime::new().map_err(|err| ZoomApiError::Transport(err.to_string()))?;
        Ok(Self {
            http: Client::new(),
            runtime,
            credentials,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            oauth_url: oauth_url.into(),
            user_id: user_id.into(),
            token: Mutex::new(None),
        })
    }

    fn access_token(&self) -> Result<String, ZoomApiError> {
        let mut cached = self.token.lock().expect("token mutex poisoned");
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let fresh = self.runtime.block_on(self.request_token())?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, ZoomApiError> {
        debug!(account_id = %self.credentials.account_id, "requesting zoom access token");
        let response = self
            .http
            .post(&self.oauth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.credentials.account_id.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZoomApiError::Auth(format!("{status}: {body}")));
        }

        let payload: TokenResponse = response.json().await.map_err(decode)?;
        Ok(AccessToken {
            value: payload.access_token,
            expires_at: Utc::now() + Duration::seconds(payload.expires_in),
        })
    }

    async fn collect_pages<P: Page>(
        &self,
        token: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<P::Item>, ZoomApiError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self.http.get(url).bearer_auth(token).query(query);
            if let Some(page_token) = &cursor {
                request = request.query(&[("next_page_token", page_token)]);
            }

            let response = request.send().await.map_err(transport)?;
            let page: P = check_status(response, url)
                .await?
                .json()
                .await
                .map_err(decode)?;
            let (page_items, next) = page.into_parts();
            items.extend(page_items);

            match next.filter(|next| !next.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(items),
            }
        }
    }

    async fn put_json<B: Serialize>(
        &self,
        token: &str,
        url: &str,
        body: &B,
    ) -> Result<(), ZoomApiError> {
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        check_status(response, url).await?;
        Ok(())
    }
}

impl fmt::Debug for ZoomRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomRestClient")
            .field("api_base_url", &self.api_base_url)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl ZoomGateway for ZoomRestClient {
    fn list_upcoming_meetings(&self) -> Result<Vec<ZoomMeeting>, ZoomApiError> {
        let token = self.access_token()?;
        let url = format!("{}/users/{}/meetings", self.api_base_url, self.user_id);
        let query = [
            ("type", "upcoming".to_string()),
            ("page_size", PAGE_SIZE.to_string()),
        ];

        let meetings = self
            .runtime
            .block_on(self.collect_pages::<MeetingsPage>(&token, &url, &query))?;
        Ok(meetings
            .into_iter()
            .filter(|meeting| meeting.is_workshop())
            .collect())
    }

    fn list_registrants(
        &self,
        meeting_id: &str,
        status: ExternalStatus,
    ) -> Result<Vec<ZoomRegistrant>, ZoomApiError> {
        let token = self.access_token()?;
        let url = format!(
            "{}/meetings/{}/registrants",
            self.api_base_url,
            normalize_meeting_id(meeting_id)
        );
        let query = [
            ("status", status.label().to_string()),
            ("page_size", PAGE_SIZE.to_string()),
        ];

        self.runtime
            .block_on(self.collect_pages::<RegistrantsPage>(&token, &url, &query))
    }

    fn update_registrant_status(
        &self,
        meeting_id: &str,
        registrant: &ZoomRegistrant,
        target: ExternalStatus,
    ) -> Result<(), ZoomApiError> {
        let action = match target {
            ExternalStatus::Approved => "approve",
            ExternalStatus::Denied => "deny",
            ExternalStatus::Pending => return Err(ZoomApiError::UnsupportedTransition(target)),
        };

        let token = self.access_token()?;
        let url = format!(
            "{}/meetings/{}/registrants/status",
            self.api_base_url,
            normalize_meeting_id(meeting_id)
        );
        let body = StatusUpdate {
            action,
            registrants: vec![RegistrantRef {
                id: &registrant.id,
                email: &registrant.email,
            }],
        };

        self.runtime.block_on(self.put_json(&token, &url, &body))
    }
}

async fn check_status(response: Response, resource: &str) -> Result<Response, ZoomApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ZoomApiError::NotFound(resource.to_string())),
        StatusCode::UNAUTHORIZED => {
            let body = response.text().await.unwrap_or_default();
            Err(ZoomApiError::Auth(body))
        }
        status => {
            let message = response.text().await.unwrap_or_default();
            Err(ZoomApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn transport(err: reqwest::Error) -> ZoomApiError {
    ZoomApiError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> ZoomApiError {
    ZoomApiError::Decode(err.to_string())
}
