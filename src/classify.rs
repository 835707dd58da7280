//! Client for the remote facial-shape classification service.
//!
//! The normalized face is serialized as a base64 JPEG data URL and posted as
//! `{"image": "..."}` to the configured endpoint. The service answers with
//! either `{"error": "..."}` or the full classification payload. Exactly one
//! attempt is made per call; retry behavior belongs to the
//! [`crate::retry`] decorator, not to this client.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, ShapeError};
use crate::normalize::NormalizedFace;

/// Successful response from the classification service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Label as returned by the service, e.g. `"Oval"`.
    pub facial_shape: String,
    /// Confidence as a percentage in `0.0..=100.0`.
    pub confidence: f32,
    pub female_recommendation: String,
    pub male_recommendation: String,
    /// Sample hairstyle photo URLs served alongside the recommendation text.
    pub female_images: Vec<String>,
    pub male_images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    image: &'a str,
}

/// The service formats confidence as a percent string (`"93.25%"`); accept a
/// bare number as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireConfidence {
    Number(f32),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResponse {
    error: Option<String>,
    facial_shape: Option<String>,
    confidence: Option<WireConfidence>,
    female_recommendation: Option<String>,
    male_recommendation: Option<String>,
    #[serde(default)]
    female_images: Vec<String>,
    #[serde(default)]
    male_images: Vec<String>,
}

fn malformed(field: &str) -> ShapeError {
    ShapeError::ClassificationUnavailable(format!("malformed response: missing {field}"))
}

/// Validate a decoded wire response into a [`ClassificationResult`].
///
/// A service-provided `error` wins over any other fields and is surfaced
/// verbatim.
pub(crate) fn into_result(wire: WireResponse) -> Result<ClassificationResult> {
    if let Some(message) = wire.error {
        return Err(ShapeError::ClassificationUnavailable(message));
    }

    let confidence = match wire.confidence.ok_or_else(|| malformed("confidence"))? {
        WireConfidence::Number(value) => value,
        WireConfidence::Text(text) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f32>()
            .map_err(|_| {
                ShapeError::ClassificationUnavailable(format!(
                    "malformed response: unparseable confidence {text:?}"
                ))
            })?,
    };

    Ok(ClassificationResult {
        facial_shape: wire.facial_shape.ok_or_else(|| malformed("facial_shape"))?,
        confidence,
        female_recommendation: wire
            .female_recommendation
            .ok_or_else(|| malformed("female_recommendation"))?,
        male_recommendation: wire
            .male_recommendation
            .ok_or_else(|| malformed("male_recommendation"))?,
        female_images: wire.female_images,
        male_images: wire.male_images,
    })
}

/// Serialize a normalized face as a JPEG data URL.
pub(crate) fn encode_jpeg_data_url(face: &NormalizedFace, quality: u8) -> Result<String> {
    let image = face.image();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ShapeError::EncodeError(e.to_string()))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&buffer)))
}

/// Single-attempt HTTP client for the classification endpoint.
pub struct ClassifierClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ClassifierClient {
    /// Build a client for `config`'s endpoint, with the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShapeError::ClassificationUnavailable(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// The endpoint this client submits to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Submit `face` and await the classification.
    ///
    /// Transport failures, non-success statuses without a parseable error
    /// body, and structurally incomplete responses all surface as
    /// [`ShapeError::ClassificationUnavailable`].
    pub async fn classify(&self, face: &NormalizedFace) -> Result<ClassificationResult> {
        let payload = encode_jpeg_data_url(face, self.config.jpeg_quality)?;
        debug!(
            endpoint = %self.config.endpoint,
            payload_bytes = payload.len(),
            "submitting normalized face"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&ClassifyRequest { image: &payload })
            .send()
            .await
            .map_err(|e| ShapeError::ClassificationUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShapeError::ClassificationUnavailable(e.to_string()))?;

        // The service reports its own failures as `{"error": ...}` bodies,
        // usually paired with a non-success status; prefer that message over
        // the bare status line.
        let wire: WireResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                ShapeError::ClassificationUnavailable(format!("malformed response: {e}"))
            } else {
                ShapeError::ClassificationUnavailable(format!("HTTP {status}"))
            }
        })?;

        into_result(wire)
    }
}
