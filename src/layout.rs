//! Arrangement rules for a brick's children.
//!
//! A [`Layout`] names the children it arranges (by brick name, in order) and
//! says how: along which [`Axis`], with which cross-axis [`Alignment`] and
//! main-axis [`Distribution`], inside which [`LayoutMetrics`]. The renderer
//! hands all of this to the platform geometry solver untouched.
use serde::{Deserialize, Serialize};

use crate::metrics::LayoutMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// Cross-axis positioning of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// Stretch to the container's cross-axis extent.
    #[default]
    Fill,
    Leading,
    Center,
    Trailing,
    FirstBaseline,
    LastBaseline,
}

/// Main-axis spacing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Distribution {
    #[default]
    Fill,
    FillEqually,
    FillProportionally,
    EqualSpacing,
    EqualCentering,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Names of the arranged children, in arrangement order.
    pub components: Vec<String>,
    pub axis: Axis,
    pub align: Alignment,
    pub distribution: Distribution,
    pub metrics: LayoutMetrics,
}

impl Layout {
    pub fn new<I, S>(
        components: I,
        axis: Axis,
        align: Alignment,
        distribution: Distribution,
        metrics: LayoutMetrics,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
            axis,
            align,
            distribution,
            metrics,
        }
    }

    pub fn horizontal<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(components, Axis::Horizontal, Alignment::Fill, Distribution::Fill, LayoutMetrics::default())
    }

    pub fn vertical<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(components, Axis::Vertical, Alignment::Fill, Distribution::Fill, LayoutMetrics::default())
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn references(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }
}

/// Layout factories for [`Brick::with_components_by`](crate::Brick::with_components_by).
///
/// Each returns a closure that receives the children's names in order and
/// builds the matching [`Layout`], so the arity is fixed by the call site:
///
/// ```ignore
/// let row = Brick::new("row")?.with_components_by(
///     [icon, title],
///     factory::horizontal(Alignment::Center, Distribution::Fill, LayoutMetrics::uniform(8.0)),
/// )?;
/// ```
pub mod factory {
    use super::*;

    pub fn stack<const N: usize>(
        axis: Axis,
        align: Alignment,
        distribution: Distribution,
        metrics: LayoutMetrics,
    ) -> impl FnOnce([&str; N]) -> Layout {
        move |names| Layout::new(names, axis, align, distribution, metrics)
    }

    pub fn horizontal<const N: usize>(
        align: Alignment,
        distribution: Distribution,
        metrics: LayoutMetrics,
    ) -> impl FnOnce([&str; N]) -> Layout {
        stack(Axis::Horizontal, align, distribution, metrics)
    }

    pub fn vertical<const N: usize>(
        align: Alignment,
        distribution: Distribution,
        metrics: LayoutMetrics,
    ) -> impl FnOnce([&str; N]) -> Layout {
        stack(Axis::Vertical, align, distribution, metrics)
    }
}
