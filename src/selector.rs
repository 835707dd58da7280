//! Selection of the primary face among multiple detections.

use crate::detector::FaceBounds;
use crate::error::{Result, ShapeError};

/// Pick the detection with the largest bounding-box area among those whose
/// width AND height both reach `min_dimension` pixels.
///
/// Ties resolve to the first qualifying detection in input order (the
/// comparison is strictly-greater, so an equal-area later box never wins).
///
/// Fails with [`ShapeError::NoFaceFound`] when `faces` is empty and with
/// [`ShapeError::NoFaceLargeEnough`] when detections exist but all fall
/// below the minimum dimension. The two outcomes are kept distinct for
/// diagnostics even though callers typically present them the same way.
pub fn select_largest_face(faces: &[FaceBounds], min_dimension: u32) -> Result<&FaceBounds> {
    if faces.is_empty() {
        return Err(ShapeError::NoFaceFound);
    }

    let min = min_dimension as f64;
    let mut best: Option<&FaceBounds> = None;

    for face in faces {
        if face.width < min || face.height < min {
            continue;
        }
        match best {
            Some(current) if face.area() <= current.area() => {}
            _ => best = Some(face),
        }
    }

    best.ok_or(ShapeError::NoFaceLargeEnough)
}
