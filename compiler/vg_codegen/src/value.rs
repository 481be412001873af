//! Values nodes expose on their output attributes.
//!
//! A constant variant is known at generation time (a slider, a color
//! picker); its `Runtime*` counterpart is a [`Value`] the generated program
//! computes. Consumers accept both, turning constants into code on demand.

use std::fmt;

use vg_ir::{ColorSpace, Modifiers, Value, Visibility};
use vg_language::types::opencv;

use crate::{AttributeRef, Current, GenError};

/// An image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct MatValue {
    pub value: Value,
    pub color: ColorSpace,
    /// Single-channel 0/255 mask, as produced by thresholding.
    pub binary: bool,
}

impl MatValue {
    pub fn new(value: Value, color: ColorSpace) -> Self {
        MatValue {
            value,
            color,
            binary: false,
        }
    }

    pub fn binary(value: Value) -> Self {
        MatValue {
            value,
            color: ColorSpace::Gray,
            binary: true,
        }
    }

    pub fn require_binary(&self, attribute: &AttributeRef) -> Result<(), GenError> {
        if self.binary {
            Ok(())
        } else {
            Err(GenError::attribute(
                attribute.clone(),
                "Mat is not binary as required, this causes runtime issues",
            ))
        }
    }

    pub fn require_non_binary(&self, attribute: &AttributeRef) -> Result<(), GenError> {
        if self.binary {
            Err(GenError::attribute(
                attribute.clone(),
                "Mat is binary, but non-binary was required",
            ))
        } else {
            Ok(())
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const ZERO: Range = Range { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Scalar(pub [f64; 4]);

impl Scalar {
    pub const ZERO: Scalar = Scalar([0.0; 4]);

    /// `new Scalar(a, b, c, d)` in the active backend.
    pub fn to_value(self, current: &Current<'_>) -> Value {
        let lang = current.language();
        let args: Vec<Value> = self.0.iter().map(|c| lang.double(*c)).collect();
        lang.new_instance(&opencv::scalar(), &args)
    }
}

/// One range per channel.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ScalarRange(pub [Range; 4]);

impl ScalarRange {
    pub const ZERO: ScalarRange = ScalarRange([Range::ZERO; 4]);

    pub fn lower(&self) -> Scalar {
        Scalar(self.0.map(|r| r.min))
    }

    pub fn upper(&self) -> Scalar {
        Scalar(self.0.map(|r| r.max))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct RotatedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

/// Element type of a runtime list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListElement {
    /// A contour (`MatOfPoint`).
    Points,
    Rect,
    RotatedRect,
    Number,
}

/// What a node outputs on one attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum GenValue {
    Mat(MatValue),

    Int(i64),
    Double(f64),
    Str(String),
    Bool(bool),

    Point { x: f64, y: f64 },
    Points(Vec<(f64, f64)>),
    RuntimePoints(Value),

    Rect(Rect),
    RuntimeRect(Value),
    RotatedRect(RotatedRect),
    RuntimeRotatedRect(Value),

    Range(Range),
    Scalar(Scalar),
    ScalarRange(ScalarRange),

    Vec2 { x: f64, y: f64 },
    RuntimeVec2 { x: Value, y: Value },

    Line { color: Scalar, thickness: i64 },
    RuntimeLine { color: Value, thickness: Value },

    List(Vec<GenValue>),
    RuntimeList { value: Value, element: ListElement },

    ColorSpace(ColorSpace),
    None,
}

impl GenValue {
    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenValue::Mat(_) => "Mat",
            GenValue::Int(_) => "Int",
            GenValue::Double(_) => "Double",
            GenValue::Str(_) => "String",
            GenValue::Bool(_) => "Boolean",
            GenValue::Point { .. } => "Point",
            GenValue::Points(_) | GenValue::RuntimePoints(_) => "Points",
            GenValue::Rect(_) | GenValue::RuntimeRect(_) => "Rect",
            GenValue::RotatedRect(_) | GenValue::RuntimeRotatedRect(_) => "RotatedRect",
            GenValue::Range(_) => "Range",
            GenValue::Scalar(_) => "Scalar",
            GenValue::ScalarRange(_) => "ScalarRange",
            GenValue::Vec2 { .. } | GenValue::RuntimeVec2 { .. } => "Vector2",
            GenValue::Line { .. } | GenValue::RuntimeLine { .. } => "LineParameters",
            GenValue::List(_) | GenValue::RuntimeList { .. } => "List",
            GenValue::ColorSpace(_) => "ColorSpace",
            GenValue::None => "None",
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            GenValue::Mat(_)
                | GenValue::RuntimePoints(_)
                | GenValue::RuntimeRect(_)
                | GenValue::RuntimeRotatedRect(_)
                | GenValue::RuntimeVec2 { .. }
                | GenValue::RuntimeLine { .. }
                | GenValue::RuntimeList { .. }
        )
    }

    pub fn into_mat(self, attribute: &AttributeRef) -> Result<MatValue, GenError> {
        match self {
            GenValue::Mat(mat) => Ok(mat),
            other => Err(mismatch(attribute, "Mat", &other)),
        }
    }

    pub fn into_scalar_range(self, attribute: &AttributeRef) -> Result<ScalarRange, GenError> {
        match self {
            GenValue::ScalarRange(range) => Ok(range),
            other => Err(mismatch(attribute, "ScalarRange", &other)),
        }
    }

    /// The runtime list behind this value, checking its element type.
    pub fn into_runtime_list(self, attribute: &AttributeRef, element: ListElement) -> Result<Value, GenError> {
        match self {
            GenValue::RuntimeList { value, element: found } if found == element => Ok(value),
            GenValue::RuntimeList { element: found, .. } => Err(GenError::attribute(
                attribute.clone(),
                format!("expected a list of {element:?}, got a list of {found:?}"),
            )),
            other => Err(mismatch(attribute, "List", &other)),
        }
    }

    /// Line color and thickness as runtime values, declaring labeled public
    /// instance variables for constant parameters.
    pub fn ensure_runtime_line(self, current: &mut Current<'_>, attribute: &AttributeRef) -> Result<(Value, Value), GenError> {
        match self {
            GenValue::RuntimeLine { color, thickness } => Ok((color, thickness)),
            GenValue::Line { color, thickness } => {
                let lang = current.language();
                let color = current.unique_variable("lineColor", color.to_value(current));
                let thickness = current.unique_variable("lineThickness", lang.int(thickness));

                current.group(|scope| {
                    scope.instance_variable(Visibility::Public, &color, Some("Line Color"), Modifiers::empty());
                    scope.instance_variable(Visibility::Public, &thickness, Some("Line Thickness"), Modifiers::empty());
                });
                Ok((color.as_value().clone(), thickness.as_value().clone()))
            }
            other => Err(mismatch(attribute, "LineParameters", &other)),
        }
    }

    /// Both components of a vector as runtime values.
    pub fn ensure_runtime_vec2(self, current: &mut Current<'_>, attribute: &AttributeRef) -> Result<(Value, Value), GenError> {
        match self {
            GenValue::RuntimeVec2 { x, y } => Ok((x, y)),
            GenValue::Vec2 { x, y } => {
                let lang = current.language();
                let x = current.unique_variable("vectorX", lang.double(x));
                let y = current.unique_variable("vectorY", lang.double(y));

                current.group(|scope| {
                    scope.instance_variable(Visibility::Public, &x, None, Modifiers::empty());
                    scope.instance_variable(Visibility::Public, &y, None, Modifiers::empty());
                });
                Ok((x.as_value().clone(), y.as_value().clone()))
            }
            other => Err(mismatch(attribute, "Vector2", &other)),
        }
    }
}

impl fmt::Display for GenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

fn mismatch(attribute: &AttributeRef, expected: &str, found: &GenValue) -> GenError {
    GenError::attribute(attribute.clone(), format!("expected {expected}, got {found}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeId, NodeRef};
    use pretty_assertions::assert_eq;

    fn port() -> AttributeRef {
        NodeRef::new(NodeId(3), "Threshold").attribute("input")
    }

    #[test]
    fn test_mat_binary_requirements() {
        let mask = MatValue::binary(Value::raw("mask"));
        assert_eq!(mask.require_binary(&port()), Ok(()));
        assert!(mask.require_non_binary(&port()).is_err());

        let rgb = MatValue::new(Value::raw("input"), ColorSpace::Rgba);
        assert!(rgb.require_binary(&port()).is_err());
    }

    #[test]
    fn test_kind_mismatch_names_the_port() {
        let err = GenValue::Int(3).into_mat(&port()).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("`input` of Threshold #3: expected Mat, got Int".to_string())
        );
    }

    #[test]
    fn test_runtime_list_element_check() {
        let list = GenValue::RuntimeList {
            value: Value::raw("contours"),
            element: ListElement::Points,
        };
        assert_eq!(
            list.clone().into_runtime_list(&port(), ListElement::Points),
            Ok(Value::raw("contours"))
        );
        assert!(list.into_runtime_list(&port(), ListElement::Rect).is_err());
    }

    #[test]
    fn test_scalar_range_bounds() {
        let range = ScalarRange([
            Range::new(0.0, 10.0),
            Range::new(1.0, 11.0),
            Range::new(2.0, 12.0),
            Range::ZERO,
        ]);
        assert_eq!(range.lower(), Scalar([0.0, 1.0, 2.0, 0.0]));
        assert_eq!(range.upper(), Scalar([10.0, 11.0, 12.0, 0.0]));
    }
}
