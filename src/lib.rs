//! ghcard
//!
//! Renders a 1200×628 social preview image for a GitHub profile: avatar,
//! name, bio, follower stats, badges and a contribution-activity grid, in a
//! light or dark theme.
//!
//! # Pipeline
//!
//! - [`github::GitHubClient`] fetches the profile record and the public
//!   profile page
//! - [`activity`] extracts the contribution calendar from that page
//! - [`rendering::layout`] arranges everything into a plain-data
//!   [`rendering::VisualTree`]
//! - a [`rendering::raster::Rasterizer`] turns the tree into PNG bytes
//! - [`card::CardService`] orchestrates one request and [`server`] exposes
//!   it over HTTP
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ghcard::{card::{CardRequest, CardService}, rendering::raster::SvgRasterizer, CardConfig};
//!
//! # async fn run() -> ghcard::Result<()> {
//! let config = CardConfig {
//!     token: std::env::var("GITHUB_PERSONAL_TOKEN").ok(),
//!     ..Default::default()
//! };
//! let rasterizer = Arc::new(SvgRasterizer::from_config(&config));
//! let service = CardService::new(config, rasterizer)?;
//! let image = service.render(&CardRequest::from_query(Some("username=octocat&dark"))).await?;
//! assert_eq!((image.width, image.height), (1200, 628));
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod activity;
pub mod card;
pub mod github;
pub mod rendering;
pub mod server;

/// Configuration for fetching and rendering cards
///
/// The defaults point at the public GitHub endpoints. The bearer token is
/// injected here rather
/// than read from the environment so the fetcher can be tested with fake
/// credentials and mock upstreams.
///
/// # Examples
///
/// ```
/// let cfg = ghcard::CardConfig::default();
/// assert_eq!(cfg.api_base, "https://api.github.com");
/// assert!(cfg.token.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// User agent sent with every upstream request
    pub user_agent: String,
    /// Base URL of the REST API serving `/users/{username}`
    pub api_base: String,
    /// Base URL of the public site serving `/{username}` profile pages
    pub web_base: String,
    /// QR code image service
    pub qr_base: String,
    /// Bearer token for the REST API; requests go out unauthenticated when unset
    pub token: Option<String>,
    /// Extra directory of fonts for the rasterizer, loaded after system fonts
    pub font_dir: Option<PathBuf>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("ghcard/", env!("CARGO_PKG_VERSION")).to_string(),
            api_base: "https://api.github.com".to_string(),
            web_base: "https://github.com".to_string(),
            qr_base: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            token: None,
            font_dir: None,
        }
    }
}

impl CardConfig {
    /// Canonical public URL of a profile.
    pub fn profile_url(&self, login: &str) -> String {
        format!("{}/{}", self.web_base.trim_end_matches('/'), login)
    }
}

/// Card dimensions; every card is rendered at the default size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 628,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CardConfig::default();
        assert_eq!(config.web_base, "https://github.com");
        assert!(config.user_agent.starts_with("ghcard/"));
        assert!(config.font_dir.is_none());
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1200);
        assert_eq!(viewport.height, 628);
    }

    #[test]
    fn test_profile_url_ignores_trailing_slash() {
        let config = CardConfig {
            web_base: "https://github.com/".into(),
            ..Default::default()
        };
        assert_eq!(config.profile_url("octocat"), "https://github.com/octocat");
    }
}
