//! Facial-shape analysis: detect the most prominent face in a photo,
//! normalize it to the square resolution a remote classifier expects, and
//! exchange it for a facial-shape label with hairstyle recommendations.
//!
//! # Example
//!
//! ```no_run
//! use faceshape::{FaceBounds, FaceDetector, ShapeAnalyzer};
//!
//! struct MyDetector;
//! impl FaceDetector for MyDetector {
//!     fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
//!         // Your detection engine here
//!         vec![]
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), faceshape::ShapeError> {
//! let photo = std::fs::read("photo.jpg").unwrap();
//! let analyzer = ShapeAnalyzer::new("http://localhost:8888/predict")?
//!     .detector(Box::new(MyDetector));
//! let report = analyzer.analyze(&photo).await?;
//! println!("{} ({:.1}%)", report.classification.facial_shape, report.classification.confidence);
//! # Ok(())
//! # }
//! ```

/// Client for the remote classification endpoint.
pub mod classify;
/// Pipeline and client configuration structures.
pub mod config;
/// Face detection traits and data types.
pub mod detector;
mod error;
/// Facial-shape labels and the static hairstyle link table.
pub mod links;
/// Geometric normalization of the selected face region.
pub mod normalize;
/// Bounded-retry decoration for the classification client.
pub mod retry;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
/// Selection of the primary face among detections.
pub mod selector;
/// Session state machine for UI front-ends.
pub mod session;

use image::imageops;
use serde::Serialize;
use tracing::{debug, warn};

pub use classify::{ClassificationResult, ClassifierClient};
pub use config::{ClientConfig, PipelineConfig};
pub use detector::{FaceBounds, FaceDetector};
pub use error::{Result, ShapeError};
pub use links::{recommendation_links, FacialShape, ShapeLinks};
pub use normalize::{CropRegion, NormalizedFace};
pub use retry::{RetryPolicy, RetryingClassifier};
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
pub use session::{Session, SessionEvent, SessionState};

/// Outcome of a successful analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeReport {
    /// The classifier's response, verbatim.
    pub classification: ClassificationResult,
    /// The label parsed into the known shape set, when it is one of them.
    pub shape: Option<FacialShape>,
    /// Static reference links for the parsed shape.
    pub links: Option<&'static ShapeLinks>,
}

impl ShapeReport {
    /// Attach the parsed shape and its reference links to a classification.
    ///
    /// A label outside the known set is kept verbatim in the classification
    /// but yields no links; the inconsistency is logged, not fatal, so the
    /// recommendation text still reaches the user.
    pub fn from_classification(classification: ClassificationResult) -> Self {
        let shape = match classification.facial_shape.parse::<FacialShape>() {
            Ok(shape) => Some(shape),
            Err(err) => {
                warn!(%err, "classifier returned a label outside the known set");
                None
            }
        };
        Self {
            classification,
            shape,
            links: shape.map(recommendation_links),
        }
    }
}

/// End-to-end analysis pipeline.
///
/// Owns the detector, the classification client, and the normalization
/// configuration. One analyzer serves many runs; each [`analyze`] call is a
/// single sequential run over one image. The analyzer is not internally
/// synchronized; at most one run per image should be in flight (see
/// [`session`] for the gating state machine front-ends use).
///
/// [`analyze`]: ShapeAnalyzer::analyze
pub struct ShapeAnalyzer {
    config: PipelineConfig,
    client: ClassifierClient,
    detector: Option<Box<dyn FaceDetector>>,
}

impl ShapeAnalyzer {
    /// Analyzer posting to `endpoint`, with default pipeline and client
    /// settings and no detector configured yet.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_client_config(ClientConfig::new(endpoint))
    }

    /// Analyzer with explicit client settings.
    pub fn with_client_config(client_config: ClientConfig) -> Result<Self> {
        Ok(Self {
            config: PipelineConfig::default(),
            client: ClassifierClient::new(client_config)?,
            detector: None,
        })
    }

    /// Replace the normalization configuration (default: [`PipelineConfig::default`]).
    pub fn pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the face detection backend.
    ///
    /// With the `rustface` feature, [`RustfaceDetector::from_model_path`]
    /// builds the built-in backend; any other engine can be plugged in by
    /// implementing [`FaceDetector`].
    pub fn detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    fn active_detector(&self) -> Result<&dyn FaceDetector> {
        self.detector
            .as_deref()
            .ok_or_else(|| ShapeError::DetectorUnavailable("no face detector configured".into()))
    }

    /// Run detection, selection, and normalization on `input` bytes (JPEG,
    /// PNG, or WebP), stopping before the network call.
    pub fn prepare(&self, input: &[u8]) -> Result<NormalizedFace> {
        self.config.validate()?;

        let decoded = image::load_from_memory(input)
            .map_err(|e| ShapeError::InvalidImage(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let gray = imageops::grayscale(&rgb);
        let faces = self.active_detector()?.detect(gray.as_raw(), width, height);
        debug!(count = faces.len(), "detector returned bounding boxes");

        let best = selector::select_largest_face(&faces, self.config.min_face_dimension)?;
        let region = normalize::expand_region(best, self.config.margin, width, height);
        debug!(?region, "normalizing selected face");

        normalize::normalize_face(&rgb, region, &self.config)
    }

    /// Full pipeline: decode → detect → select → normalize → classify →
    /// link lookup.
    pub async fn analyze(&self, input: &[u8]) -> Result<ShapeReport> {
        let face = self.prepare(input)?;
        let classification = self.client.classify(&face).await?;
        Ok(ShapeReport::from_classification(classification))
    }
}
