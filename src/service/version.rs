use std::time::Duration;

use color_eyre::eyre::Context;
use reqwest::{Client, ClientBuilder, header};
use semver::Version;
use serde::Deserialize;
use tracing::instrument;

use super::CURRENT_VERSION;
use crate::{
    config::UpdateConfig,
    errors::{Result, UserFacingError},
    utils::parse_version_tag,
};

/// Provides both the version of the running binary and the latest published one
#[trait_variant::make(Send)]
pub trait VersionSource {
    /// The statically known version of the running binary
    fn local_version(&self) -> Version;

    /// Retrieves the latest published version
    async fn latest_remote_version(&self) -> Result<Version>;
}

/// [VersionSource] backed by the latest release of a GitHub repository
#[derive(Clone)]
pub struct GitHubVersionSource {
    client: Client,
    url: String,
}

/// A simple struct to deserialize the relevant fields from the GitHub API response
#[derive(Deserialize, Debug)]
struct GithubRelease {
    tag_name: String,
}

impl GitHubVersionSource {
    /// Builds a new source from the update configuration
    pub fn new(config: &UpdateConfig) -> color_eyre::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .wrap_err("Couldn't build the releases client")?;
        Ok(Self::with_client(client, config))
    }

    /// Builds a new source reusing the given client
    pub fn with_client(client: Client, config: &UpdateConfig) -> Self {
        Self {
            client,
            url: config.latest_release_url(),
        }
    }

    /// Url of the latest release endpoint
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl VersionSource for GitHubVersionSource {
    fn local_version(&self) -> Version {
        CURRENT_VERSION.clone()
    }

    #[instrument(skip_all)]
    async fn latest_remote_version(&self) -> Result<Version> {
        tracing::debug!("Fetching latest release from {}", self.url);
        let res = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    tracing::warn!("Request timeout: {err:?}");
                    UserFacingError::ReleaseRequestFailed(String::from("the request timed out"))
                } else if err.is_connect() {
                    tracing::warn!("Couldn't connect to the releases API: {err:?}");
                    UserFacingError::ReleaseRequestFailed(String::from("error connecting to the releases API"))
                } else {
                    tracing::error!("Couldn't perform the request: {err:?}");
                    UserFacingError::ReleaseRequestFailed(err.to_string())
                }
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let status_str = status.as_str();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!("Got response [{status_str}]:\n{body}");
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()))
                .unwrap_or_else(|| match status.canonical_reason() {
                    Some(reason) => format!("received {status_str} {reason} response"),
                    None => format!("received {status_str} response"),
                });
            return Err(UserFacingError::ReleaseRequestFailed(message).into());
        }

        let body = res
            .text()
            .await
            .map_err(|err| UserFacingError::ReleaseRequestFailed(err.to_string()))?;
        let release: GithubRelease = serde_json::from_str(&body).map_err(|err| {
            tracing::warn!("Unexpected release response: {body}");
            UserFacingError::ReleaseInvalidResponse(err.to_string())
        })?;

        let latest = parse_version_tag(&release.tag_name)
            .map_err(|_| UserFacingError::ReleaseInvalidTag(release.tag_name.clone()))?;
        tracing::debug!("Fetched latest version: v{latest}");

        Ok(latest)
    }
}
