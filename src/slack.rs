use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::cursor::Cursor;
use crate::model::{
    Channel, ConversationsListResponse, PostMessageResponse, ReactionsPage, User,
    UsersListResponse,
};
use crate::settings::SlackSettings;
use crate::{AppError, Result};

const USER_AGENT: &str = concat!("slack-emoji-digest/", env!("CARGO_PKG_VERSION"));
const LIST_PAGE_LIMIT: &str = "200";

/// The Slack Web API calls the digest relies on.
pub trait SlackApi {
    fn list_users(&self) -> Result<Vec<User>>;

    /// One page of the items `user_id` reacted to.
    fn list_reactions(&self, user_id: &str, cursor: &Cursor) -> Result<ReactionsPage>;

    fn list_channels(&self) -> Result<Vec<Channel>>;

    fn post_message(&self, channel_id: &str, text: &str) -> Result<()>;
}

/// Blocking Slack Web API client authenticated with a bearer token.
pub struct HttpSlackClient {
    http: Client,
    api_base: String,
    token: String,
    max_pages: usize,
}

/// Page of a `users.list` / `conversations.list` style listing.
struct ListPage<T> {
    ok: bool,
    error: Option<String>,
    items: Vec<T>,
    next_cursor: Option<String>,
}

impl HttpSlackClient {
    /// Build a client; every request shares the configured timeout.
    ///
    /// `max_pages` bounds how many pages of users or channels are read.
    pub fn new(token: &str, settings: &SlackSettings, max_pages: usize) -> Result<Self> {
        let api_base = settings.api_base_url.trim_end_matches('/').to_string();
        Url::parse(&api_base)
            .map_err(|e| AppError::InvalidConfig(format!("api-base-url {}: {}", api_base, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            api_base,
            token: token.trim().to_string(),
            max_pages: max_pages.max(1),
        })
    }

    fn endpoint(&self, method: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.api_base, method))
            .map_err(|e| AppError::Http(format!("invalid URL for {}: {}", method, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn get<T: DeserializeOwned>(&self, method: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(method, params)?;
        debug!(%method, ?params, "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| AppError::Http(format!("{}: {}", method, e)))?;

        decode(method, response)
    }

    fn collect_pages<R, T>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        into_page: impl Fn(R) -> ListPage<T>,
    ) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
    {
        let mut all = Vec::new();
        let mut cursor = Cursor::NotStarted;

        for _ in 0..self.max_pages {
            let mut query = params.to_vec();
            if let Some(token) = cursor.token() {
                query.push(("cursor", token));
            }

            let page = into_page(self.get::<R>(method, &query)?);
            if !page.ok {
                return Err(slack_error(method, page.error));
            }

            all.extend(page.items);
            cursor = Cursor::after_page(page.next_cursor.as_deref());
            if cursor.is_exhausted() {
                break;
            }
        }

        if !cursor.is_exhausted() {
            warn!(%method, max_pages = self.max_pages, "stopped paginating at page limit");
        }

        Ok(all)
    }
}

impl SlackApi for HttpSlackClient {
    fn list_users(&self) -> Result<Vec<User>> {
        self.collect_pages(
            "users.list",
            &[("limit", LIST_PAGE_LIMIT)],
            |r: UsersListResponse| ListPage {
                ok: r.ok,
                error: r.error,
                items: r.members,
                next_cursor: r.response_metadata.and_then(|m| m.next_cursor),
            },
        )
    }

    fn list_reactions(&self, user_id: &str, cursor: &Cursor) -> Result<ReactionsPage> {
        let mut params = vec![("user", user_id), ("full", "true")];
        if let Some(token) = cursor.token() {
            params.push(("cursor", token));
        }

        let page: ReactionsPage = self.get("reactions.list", &params)?;
        if !page.ok {
            return Err(slack_error("reactions.list", page.error));
        }
        Ok(page)
    }

    fn list_channels(&self) -> Result<Vec<Channel>> {
        self.collect_pages(
            "conversations.list",
            &[("types", "public_channel"), ("limit", LIST_PAGE_LIMIT)],
            |r: ConversationsListResponse| ListPage {
                ok: r.ok,
                error: r.error,
                items: r.channels,
                next_cursor: r.response_metadata.and_then(|m| m.next_cursor),
            },
        )
    }

    fn post_message(&self, channel_id: &str, text: &str) -> Result<()> {
        let method = "chat.postMessage";
        let url = self.endpoint(method, &[])?;
        debug!(%method, channel = %channel_id, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "channel": channel_id, "text": text }))
            .send()
            .map_err(|e| AppError::Http(format!("{}: {}", method, e)))?;

        let body: PostMessageResponse = decode(method, response)?;
        if !body.ok {
            return Err(slack_error(method, body.error));
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(method: &str, response: reqwest::blocking::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Http(format!("{} returned HTTP {}", method, status)));
    }

    response
        .json::<T>()
        .map_err(|e| AppError::JsonParse(format!("{}: {}", method, e)))
}

fn slack_error(method: &str, error: Option<String>) -> AppError {
    AppError::SlackApi(format!(
        "{} failed: {}",
        method,
        error.unwrap_or_else(|| "unknown error".to_string())
    ))
}
