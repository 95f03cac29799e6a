//! GitHub access: profile lookups, the public profile page and image assets.

use futures::future::join_all;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::activity::{self, WeeklyActivity};
use crate::rendering::AssetStore;
use crate::{CardConfig, Error, Result};

/// A user profile from the `/users/{username}` API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileRecord {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub created_at: String,
    pub followers: u64,
    pub following: u64,
    pub company: Option<String>,
    pub location: Option<String>,
    pub twitter_username: Option<String>,
}

impl ProfileRecord {
    /// Display name, falling back to the login when the profile has none.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// HTTP client for the profile API and the public site.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    config: CardConfig,
}

impl GitHubClient {
    pub fn new(config: CardConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Look up a profile.
    ///
    /// 404 maps to [`Error::NotFound`]; every other non-200 status maps to
    /// [`Error::NetworkError`]. The API's `message` field is logged when the
    /// error body carries one, never returned to the caller.
    pub async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord> {
        let url = endpoint(&self.config.api_base, &["users", username])?;

        let mut req = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await?;
        let status = res.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(username.to_string()));
        }

        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or_default();
            if !message.is_empty() {
                log::warn!("profile lookup for {:?} failed ({}): {}", username, status, message);
            }
            return Err(Error::NetworkError {
                status: Some(status.as_u16()),
                message,
            });
        }

        res.json::<ProfileRecord>().await.map_err(|e| Error::NetworkError {
            status: Some(status.as_u16()),
            message: format!("Failed to deserialize profile: {}", e),
        })
    }

    /// Fetch the public profile page and extract its contribution calendar.
    pub async fn fetch_activity(&self, username: &str) -> Result<WeeklyActivity> {
        let url = endpoint(&self.config.web_base, &[username])?;

        let html = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(activity::extract_weekly_activity(&html))
    }

    /// Download image assets concurrently.
    ///
    /// Failed downloads are logged and left out of the store.
    pub async fn fetch_assets(&self, urls: &[String]) -> AssetStore {
        let downloads = urls
            .iter()
            .map(|url| async move { (url, self.download(url).await) });

        let mut store = AssetStore::default();
        for (url, bytes) in join_all(downloads).await {
            match bytes {
                Ok(bytes) => store.insert(url.clone(), bytes),
                Err(e) => log::warn!("failed to fetch asset {}: {}", url, e),
            }
        }
        store
    }

    async fn download(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let res = self.http.get(url).send().await?.error_for_status()?;
        Ok(res.bytes().await?.to_vec())
    }
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::ConfigError(format!("Invalid base URL {:?}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::ConfigError(format!("Base URL {:?} cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
