//! Configuration structures for the normalization pipeline and the
//! classification client.
//!
//! Both structs can be deserialized from disk (e.g. a JSON or TOML config
//! file) and are passed in at construction time; no tunable is embedded as a
//! literal at its use site.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ShapeError};

/// Geometry parameters of the face-normalization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side length of the square image the classifier expects, in pixels.
    pub canonical_resolution: u32,
    /// Detections narrower or shorter than this are ignored.
    pub min_face_dimension: u32,
    /// Fixed expansion applied on all four sides of the selected box before
    /// cropping, to include context beyond the tight face boundary.
    pub margin: u32,
    /// RGB fill used to square off a non-square crop.
    pub padding_color: [u8; 3],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_resolution: 224,
            min_face_dimension: 50,
            margin: 10,
            padding_color: [0, 0, 0],
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.canonical_resolution == 0 {
            return Err(ShapeError::InvalidConfig(
                "canonical_resolution must be > 0".into(),
            ));
        }
        if self.min_face_dimension == 0 {
            return Err(ShapeError::InvalidConfig(
                "min_face_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Connection parameters of the remote classification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the prediction endpoint.
    pub endpoint: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// JPEG quality (1-100) used when serializing the normalized face.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_jpeg_quality() -> u8 {
    90
}

impl ClientConfig {
    /// Config with defaults for everything but the endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: default_timeout(),
            jpeg_quality: default_jpeg_quality(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ShapeError::InvalidConfig("endpoint must be set".into()));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ShapeError::InvalidConfig(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Serialize `timeout` as whole seconds so config files stay readable.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
