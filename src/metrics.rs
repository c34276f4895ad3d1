use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Insets around a container's children plus the spacing between them.
///
/// `horizontal` is the gap between items laid out along the horizontal axis,
/// `vertical` the gap along the vertical axis. Non-finite values are left out
/// of the document form; a missing or non-numeric field reads back as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub top: f64,
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub left: f64,
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub bottom: f64,
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub right: f64,
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub horizontal: f64,
    #[serde(skip_serializing_if = "non_finite", deserialize_with = "number_or_zero")]
    pub vertical: f64,
}

fn non_finite(v: &f64) -> bool {
    !v.is_finite()
}

fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or_default())
}

impl LayoutMetrics {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64, horizontal: f64, vertical: f64) -> Self {
        Self { top, left, bottom, right, horizontal, vertical }
    }

    /// Same inset on all four edges, no spacing.
    pub fn uniform(inset: f64) -> Self {
        Self { top: inset, left: inset, bottom: inset, right: inset, ..Self::default() }
    }

    pub fn with_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn inset_width(&self) -> f64 { self.left + self.right }
    pub fn inset_height(&self) -> f64 { self.top + self.bottom }
}
