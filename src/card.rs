//! One card request, from query string to encoded image.

use std::sync::Arc;

use url::Url;

use crate::github::GitHubClient;
use crate::rendering::layout::{error_card, profile_card};
use crate::rendering::raster::Rasterizer;
use crate::rendering::{AssetStore, Palette, RenderedImage, Theme, VisualTree};
use crate::{CardConfig, Error, Result};

/// Cache hint attached to successfully rendered profile cards.
pub const CACHE_CONTROL: &str = "public, max-age=60";

/// Message shown when the upstream lookup fails for any reason other than
/// an unknown user.
pub const GENERIC_FAILURE: &str = "An error occurred when fetching information about the user.";

/// Parsed query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardRequest {
    pub username: Option<String>,
    pub theme: Theme,
}

impl CardRequest {
    /// Parse a raw query string. `dark` selects the dark theme by presence
    /// alone, whatever its value.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut username = None;
        let mut dark = false;
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "username" if username.is_none() => username = Some(value.into_owned()),
                "dark" => dark = true,
                _ => {}
            }
        }
        CardRequest {
            username,
            theme: Theme::from_dark_flag(dark),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Profile,
    Error,
}

/// A composed card, not yet rasterized.
#[derive(Debug, Clone)]
pub struct Card {
    pub kind: CardKind,
    pub tree: VisualTree,
}

impl Card {
    pub fn error(message: &str) -> Self {
        Card {
            kind: CardKind::Error,
            tree: error_card(message),
        }
    }

    /// Only profile cards carry a cache hint.
    pub fn cache_control(&self) -> Option<&'static str> {
        match self.kind {
            CardKind::Profile => Some(CACHE_CONTROL),
            CardKind::Error => None,
        }
    }
}

/// User-facing message for a failure. Upstream detail is never included.
pub fn error_message(err: &Error) -> String {
    match err {
        Error::MissingUsername => "No username provided.".to_string(),
        Error::NotFound(username) => format!("No GitHub user with username “{}”.", username),
        _ => GENERIC_FAILURE.to_string(),
    }
}

/// URL of the QR code image pointing at `target`, colored for `palette`.
pub fn qr_code_url(config: &CardConfig, target: &str, palette: &Palette) -> Result<String> {
    let url = Url::parse_with_params(
        &config.qr_base,
        &[
            ("size", "84x84".to_string()),
            ("bgcolor", palette.qr_background.to_hex()),
            ("color", palette.qr_foreground.to_hex()),
            ("data", target.to_string()),
        ],
    )
    .map_err(|e| Error::ConfigError(format!("Invalid QR service URL {:?}: {}", config.qr_base, e)))?;
    Ok(url.into())
}

/// Fetches, lays out and rasterizes cards.
#[derive(Clone)]
pub struct CardService {
    github: GitHubClient,
    rasterizer: Arc<dyn Rasterizer>,
}

impl CardService {
    pub fn new(config: CardConfig, rasterizer: Arc<dyn Rasterizer>) -> Result<Self> {
        Ok(Self {
            github: GitHubClient::new(config)?,
            rasterizer,
        })
    }

    pub fn config(&self) -> &CardConfig {
        self.github.config()
    }

    /// Resolve a request to a card. Every failure becomes an error card.
    pub async fn compose(&self, request: &CardRequest) -> Card {
        match self.profile_tree(request).await {
            Ok(tree) => Card {
                kind: CardKind::Profile,
                tree,
            },
            Err(e) => {
                match &e {
                    Error::MissingUsername | Error::NotFound(_) => log::info!("{}", e),
                    _ => log::warn!("{}", e),
                }
                Card::error(&error_message(&e))
            }
        }
    }

    async fn profile_tree(&self, request: &CardRequest) -> Result<VisualTree> {
        let username = request
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingUsername)?;

        let profile = self.github.fetch_profile(username).await?;
        let activity = self.github.fetch_activity(username).await?;

        let palette = request.theme.palette();
        let qr = qr_code_url(self.config(), &self.config().profile_url(&profile.login), &palette)?;
        Ok(profile_card(&profile, &activity, request.theme, &qr))
    }

    /// Rasterize a composed card, fetching its image assets first.
    pub async fn rasterize(&self, card: Card) -> Result<RenderedImage> {
        let assets = match card.kind {
            CardKind::Profile => self.github.fetch_assets(&card.tree.image_sources()).await,
            CardKind::Error => AssetStore::default(),
        };

        let cache_control = card.cache_control();
        let (width, height) = (card.tree.width, card.tree.height);
        let rasterizer = self.rasterizer.clone();
        let tree = card.tree;
        let data = tokio::task::spawn_blocking(move || rasterizer.rasterize(&tree, &assets))
            .await
            .map_err(|e| Error::RenderError(format!("Rasterizer task failed: {}", e)))??;

        Ok(RenderedImage {
            width,
            height,
            data,
            content_type: self.rasterizer.content_type(),
            cache_control,
        })
    }

    /// Compose and rasterize.
    pub async fn render(&self, request: &CardRequest) -> Result<RenderedImage> {
        let card = self.compose(request).await;
        self.rasterize(card).await
    }
}
