//! Image hosting for pictures embedded in service content.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::config::AssetsConfig;

/// Folder receiving every image uploaded from service content.
pub const SERVICES_FOLDER: &str = "services";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset host request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("asset host responded with status {0}")]
    Rejected(u16),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedAsset {
    pub secure_url: String,
    pub public_id: String,
}

/// Stored attributes of a hosted image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetMetadata {
    pub secure_url: String,
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, bytes: &[u8], mime: &str, folder: &str)
    -> Result<HostedAsset, AssetError>;
    async fn destroy(&self, public_id: &str) -> Result<(), AssetError>;
    async fn describe(&self, public_id: &str) -> Result<AssetMetadata, AssetError>;
    /// URL prefix under which hosted images are served.
    fn delivery_base_url(&self) -> &str;
}

/// URLs in `content` that point at images served by the asset host.
pub fn hosted_image_urls(content: &str, delivery_base_url: &str) -> Vec<String> {
    let pattern = format!(r#"{}[^\s"]+"#, regex::escape(delivery_base_url));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(content).map(|m| m.as_str().to_string()).collect(),
        Err(e) => {
            log::error!("Invalid delivery url pattern {pattern}: {e}");
            vec![]
        }
    }
}

/// Public id of a hosted image: its file name, without extension, inside
/// the services folder.
pub fn public_id_for(url: &str) -> String {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    format!("{SERVICES_FOLDER}/{stem}")
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    file: String,
    folder: &'a str,
}

/// Client of the hosted image service's HTTP API.
pub struct HttpAssetHost {
    http: reqwest::Client,
    base_url: String,
    delivery_base_url: String,
    api_key: String,
}

impl HttpAssetHost {
    pub fn new(config: &AssetsConfig) -> Result<Self, AssetError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delivery_base_url: config.delivery_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn resource_url(&self, public_id: &str) -> String {
        format!("{}/resources/{}", self.base_url, public_id)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), AssetError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AssetError::Rejected(status.as_u16()))
    }
}

#[async_trait]
impl AssetHost for HttpAssetHost {
    async fn upload(
        &self,
        bytes: &[u8],
        mime: &str,
        folder: &str,
    ) -> Result<HostedAsset, AssetError> {
        let request = UploadRequest {
            file: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
            folder,
        };
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json::<HostedAsset>().await?)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), AssetError> {
        let response = self
            .http
            .delete(self.resource_url(public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(&response)
    }

    async fn describe(&self, public_id: &str) -> Result<AssetMetadata, AssetError> {
        let response = self
            .http
            .get(self.resource_url(public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json::<AssetMetadata>().await?)
    }

    fn delivery_base_url(&self) -> &str {
        &self.delivery_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://res.example.com/demo/image/upload/";

    #[test]
    fn finds_hosted_urls_in_html() {
        let content = format!(
            r#"<p><img src="{BASE}v1/services/abc.png"> and <img src="https://other.com/x.png"> <img src="{BASE}v2/services/def.jpg"></p>"#
        );

        let urls = hosted_image_urls(&content, BASE);

        assert_eq!(
            urls,
            vec![
                format!("{BASE}v1/services/abc.png"),
                format!("{BASE}v2/services/def.jpg"),
            ]
        );
    }

    #[test]
    fn public_id_drops_extension_and_path() {
        assert_eq!(
            public_id_for("https://res.example.com/demo/image/upload/v1/services/abc.png"),
            "services/abc"
        );
        assert_eq!(public_id_for("plain"), "services/plain");
    }
}
