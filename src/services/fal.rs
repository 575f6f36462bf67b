use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Billed price of one generated image on the Nano Banana model.
pub const COST_PER_IMAGE: f64 = 0.039;

/// Client for the fal.run image editing API. Any provider speaking the same
/// request/response contract can stand behind `base_url`.
#[derive(Clone)]
pub struct FalClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    pub model: String,
    pub num_images: u32,
    pub output_format: String,
}

#[derive(Serialize)]
struct FalEditRequest<'a> {
    prompt: &'a str,
    image_urls: Vec<&'a str>,
    num_images: u32,
    output_format: &'a str,
    sync_mode: bool,
}

#[derive(Deserialize)]
pub struct FalImage {
    pub url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Deserialize)]
pub struct FalEditResponse {
    pub images: Vec<FalImage>,
    pub description: Option<String>,
}

impl FalClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        num_images: u32,
        output_format: String,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            num_images,
            output_format,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.fal_base_url.clone(),
            config.fal_api_key.clone(),
            config.fal_model.clone(),
            config.num_output_images,
            config.output_format.clone(),
            Duration::from_secs(config.upstream_timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one synchronous edit request. No retry: a failed call is the
    /// caller's decision to repeat, since every attempt is billable.
    pub async fn edit_image(
        &self,
        instruction: &str,
        image_url: &str,
    ) -> Result<FalEditResponse, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::InternalServerError(
                "Fal.ai API key not configured. Please set FAL_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let request = FalEditRequest {
            prompt: instruction,
            image_urls: vec![image_url],
            num_images: self.num_images,
            output_format: &self.output_format,
            sync_mode: true,
        };

        let url = format!("{}/{}", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::UpstreamTimeout(
                        "The image editing service timed out. Please try again.".to_string(),
                    )
                } else {
                    eprintln!("Fal request error: {}", e);
                    AppError::UpstreamFailure(
                        "Failed to reach the image editing service".to_string(),
                    )
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eprintln!("Fal API error: {} - {}", status, body);
            return Err(AppError::UpstreamFailure(format!(
                "Image editing service error: {}",
                status
            )));
        }

        let result: FalEditResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamTimeout(
                    "The image editing service timed out. Please try again.".to_string(),
                )
            } else {
                eprintln!("Fal response decode error: {}", e);
                AppError::UpstreamFailure(
                    "Malformed response from the image editing service".to_string(),
                )
            }
        })?;

        if result.images.is_empty() {
            return Err(AppError::UpstreamFailure(
                "No images returned from the image editing service".to_string(),
            ));
        }

        Ok(result)
    }
}
