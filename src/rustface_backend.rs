use std::path::Path;

use crate::detector::{FaceBounds, FaceDetector};
use crate::error::{Result, ShapeError};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Loads a SeetaFace model file from disk on construction. A missing or
/// corrupt model surfaces as [`ShapeError::DetectorUnavailable`], which is a
/// different failure from a photo that simply contains no face.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model (e.g. `seeta_fd_frontal_v1.0.bin`) from `path`.
    pub fn from_model_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model = rustface::read_model(std::io::BufReader::new(
            std::fs::File::open(path).map_err(|e| {
                ShapeError::DetectorUnavailable(format!("{}: {e}", path.display()))
            })?,
        ))
        .map_err(|e| ShapeError::DetectorUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
