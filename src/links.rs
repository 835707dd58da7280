//! Facial-shape labels and the static hairstyle reference-link table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of facial shapes the remote classifier can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacialShape {
    Heart,
    Oblong,
    Oval,
    Round,
    Square,
}

impl FacialShape {
    /// All known shapes, in label order.
    pub const ALL: [FacialShape; 5] = [
        FacialShape::Heart,
        FacialShape::Oblong,
        FacialShape::Oval,
        FacialShape::Round,
        FacialShape::Square,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacialShape::Heart => "Heart",
            FacialShape::Oblong => "Oblong",
            FacialShape::Oval => "Oval",
            FacialShape::Round => "Round",
            FacialShape::Square => "Square",
        }
    }
}

impl fmt::Display for FacialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacialShape {
    type Err = UnknownShapeLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heart" => Ok(FacialShape::Heart),
            "oblong" => Ok(FacialShape::Oblong),
            "oval" => Ok(FacialShape::Oval),
            "round" => Ok(FacialShape::Round),
            "square" => Ok(FacialShape::Square),
            _ => Err(UnknownShapeLabel(s.to_string())),
        }
    }
}

/// A label outside the classifier's documented set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShapeLabel(pub String);

impl fmt::Display for UnknownShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown facial shape label: {:?}", self.0)
    }
}

impl std::error::Error for UnknownShapeLabel {}

/// Hairstyle reference links for one facial shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeLinks {
    pub female: &'static str,
    pub male: &'static str,
}

/// Reference links for `shape`.
///
/// Total over [`FacialShape`], so a successfully parsed label always has an
/// entry; only labels that fail to parse lack links.
pub fn recommendation_links(shape: FacialShape) -> &'static ShapeLinks {
    match shape {
        FacialShape::Heart => &ShapeLinks {
            female: "https://www.newbeauty.com/haircuts-for-heart-shaped-faces/",
            male: "https://therighthairstyles.com/hairstyles-for-heart-shaped-face-male/",
        },
        FacialShape::Oblong => &ShapeLinks {
            female:
                "https://www.byrdie.com/the-most-flattering-hairstyles-for-the-oblong-face-shape-345773",
            male: "https://therighthairstyles.com/haircuts-for-oblong-faces-men/",
        },
        FacialShape::Oval => &ShapeLinks {
            female: "https://therighthairstyles.com/hairstyles-for-oval-face/",
            male: "https://menhairstylist.com/mens-hairstyles-for-oval-faces/",
        },
        FacialShape::Round => &ShapeLinks {
            female:
                "https://www.byrdie.com/hairstyles-for-round-faces-the-most-flattering-cuts-346413",
            male: "https://therighthairstyles.com/haircuts-for-round-faces-men/",
        },
        FacialShape::Square => &ShapeLinks {
            female: "https://www.byrdie.com/the-best-haircuts-for-square-face-shapes-345768",
            male: "https://therighthairstyles.com/men-square-face-haircuts/",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("Oval".parse::<FacialShape>().unwrap(), FacialShape::Oval);
        assert_eq!("oval".parse::<FacialShape>().unwrap(), FacialShape::Oval);
        assert_eq!("HEART".parse::<FacialShape>().unwrap(), FacialShape::Heart);
        assert_eq!(
            " round ".parse::<FacialShape>().unwrap(),
            FacialShape::Round
        );
    }

    #[test]
    fn unknown_label_is_reported() {
        let err = "Diamond".parse::<FacialShape>().unwrap_err();
        assert_eq!(err.0, "Diamond");
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for shape in FacialShape::ALL {
            assert_eq!(shape.to_string().parse::<FacialShape>().unwrap(), shape);
        }
    }

    #[test]
    fn every_shape_has_links() {
        for shape in FacialShape::ALL {
            let links = recommendation_links(shape);
            assert!(links.female.starts_with("https://"));
            assert!(links.male.starts_with("https://"));
        }
    }

    #[test]
    fn oval_links_point_at_oval_pages() {
        let links = recommendation_links(FacialShape::Oval);
        assert!(links.female.contains("oval"));
        assert!(links.male.contains("oval"));
    }
}
