//! JSON input file loading and validation
//!
//! Input format:
//!
//! ```json
//! {
//!   "innerShape": [
//!     {"shape": "rectangle", "width": 20, "height": 10, "identifier": "A"}
//!   ],
//!   "outerShape": {"shape": "circle", "radius": 15},
//!   "additionalConstraints": {
//!     "paddingBetweenInnerShapes": {"amount": 1.0},
//!     "paddingBetweenInnerShapesAndOuter": {"amount": 0.5}
//!   },
//!   "resultOutput": {"outputFormat": "CLI"}
//! }
//! ```
//!
//! The outer circle, constraints and output block are optional. When an
//! outer radius (or diameter) is given it becomes the solver's target
//! radius.

use circlepack_core::{Instance, RectSpec};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(rename = "innerShape")]
    inner_shape: Vec<InnerShape>,
    #[serde(rename = "outerShape")]
    outer_shape: Option<OuterShape>,
    #[serde(rename = "additionalConstraints")]
    additional_constraints: Option<Constraints>,
    #[serde(rename = "resultOutput")]
    #[allow(dead_code)]
    result_output: Option<ResultOutput>,
}

#[derive(Debug, Deserialize)]
struct InnerShape {
    shape: String,
    width: f64,
    height: f64,
    identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OuterShape {
    shape: Option<String>,
    radius: Option<f64>,
    diameter: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Constraints {
    #[serde(rename = "paddingBetweenInnerShapes")]
    padding_inner: Option<Padding>,
    #[serde(rename = "paddingBetweenInnerShapesAndOuter")]
    padding_outer: Option<Padding>,
}

#[derive(Debug, Deserialize)]
struct Padding {
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct ResultOutput {
    #[serde(rename = "outputFormat")]
    #[allow(dead_code)]
    output_format: Option<String>,
}

/// A parsed and validated input file.
#[derive(Debug)]
pub struct LoadedInput {
    /// The packing instance
    pub instance: Instance,
    /// One identifier per rectangle, in input order
    pub identifiers: Vec<String>,
    /// Target radius derived from the outer circle, if given
    pub target_radius: Option<f64>,
}

/// Load and validate a JSON input file.
pub fn load_json(path: &Path) -> Result<LoadedInput, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let data: InputFile =
        serde_json::from_str(&text).map_err(|e| format!("invalid JSON file: {}", e))?;

    if data.inner_shape.is_empty() {
        return Err("'innerShape' must contain at least one rectangle".into());
    }

    let mut rects = Vec::with_capacity(data.inner_shape.len());
    let mut identifiers = Vec::with_capacity(data.inner_shape.len());
    for (idx, item) in data.inner_shape.iter().enumerate() {
        if item.shape != "rectangle" {
            return Err(format!(
                "item {} in 'innerShape' must be a shape of type 'rectangle'",
                idx
            ));
        }
        rects.push(RectSpec::new(item.width, item.height));
        identifiers.push(
            item.identifier
                .clone()
                .unwrap_or_else(|| format!("Rect_{}", idx + 1)),
        );
    }

    let target_radius = match &data.outer_shape {
        Some(outer) => {
            if let Some(shape) = &outer.shape {
                if shape != "circle" {
                    return Err("only 'circle' outerShape is currently supported".into());
                }
            }
            match (outer.radius, outer.diameter) {
                (Some(_), Some(_)) => {
                    return Err(
                        "cannot specify both 'radius' and 'diameter' in outerShape".into()
                    );
                }
                (Some(r), None) => Some(r),
                (None, Some(d)) => Some(d / 2.0),
                (None, None) => None,
            }
        }
        None => None,
    };

    let mut padding_inner = 0.0;
    let mut padding_outer = 0.0;
    if let Some(constraints) = &data.additional_constraints {
        if let Some(p) = &constraints.padding_inner {
            padding_inner = p.amount;
        }
        if let Some(p) = &constraints.padding_outer {
            padding_outer = p.amount;
        }
    }

    Ok(LoadedInput {
        instance: Instance::with_padding(rects, padding_outer, padding_inner),
        identifiers,
        target_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "circlepack-input-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_full_input_parses() {
        let path = write_temp(
            r#"{
                "innerShape": [
                    {"shape": "rectangle", "width": 20, "height": 10, "identifier": "A"},
                    {"shape": "rectangle", "width": 15, "height": 15}
                ],
                "outerShape": {"shape": "circle", "diameter": 60},
                "additionalConstraints": {
                    "paddingBetweenInnerShapes": {"amount": 1.0},
                    "paddingBetweenInnerShapesAndOuter": {"amount": 0.5}
                }
            }"#,
        );
        let loaded = load_json(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.instance.rects.len(), 2);
        assert_eq!(loaded.identifiers, vec!["A", "Rect_2"]);
        assert_eq!(loaded.instance.inner_padding, 1.0);
        assert_eq!(loaded.instance.outer_padding, 0.5);
        assert_eq!(loaded.target_radius, Some(30.0));
    }

    #[test]
    fn test_non_rectangle_shape_rejected() {
        let path = write_temp(
            r#"{"innerShape": [{"shape": "triangle", "width": 1, "height": 1}]}"#,
        );
        let err = load_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.contains("rectangle"));
    }

    #[test]
    fn test_radius_and_diameter_conflict() {
        let path = write_temp(
            r#"{
                "innerShape": [{"shape": "rectangle", "width": 1, "height": 1}],
                "outerShape": {"radius": 5, "diameter": 10}
            }"#,
        );
        let err = load_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.contains("radius"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_json(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(err.contains("/nonexistent/input.json"));
    }
}
