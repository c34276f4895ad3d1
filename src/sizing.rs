//! Manual height calculation for a brick tree.
//!
//! The platform solver positions views; this is the off-screen pass used when
//! a row height must be known before any view exists (variable-height list
//! cells). It walks the tree bottom-up:
//!
//! 1. a fixed `height` wins outright;
//! 2. otherwise children are measured first, at the fitting width minus the
//!    container's horizontal insets;
//! 3. a `height_resolver` turns `(width, child heights, metrics)` into the
//!    node's height;
//! 4. without one, children stack: summed with vertical spacing along a
//!    vertical axis, maxed along a horizontal one, plus vertical insets;
//! 5. leaves with neither are measured by the caller.
use crate::brick::Brick;
use crate::layout::Axis;
use crate::metrics::LayoutMetrics;

pub fn fitting_height<M>(brick: &Brick, fitting_width: f64, measure_leaf: &M) -> f64
where
    M: Fn(&Brick, f64) -> f64,
{
    if let Some(height) = brick.height() {
        return height;
    }
    let width = brick.width().unwrap_or(fitting_width);
    let children = brick.children();
    if children.is_empty() && brick.height_resolver().is_none() {
        return measure_leaf(brick, width);
    }

    let metrics = brick.layout().map(|l| l.metrics).unwrap_or_default();
    let inner_width = (width - metrics.inset_width()).max(0.0);
    let heights: Vec<f64> = children
        .iter()
        .map(|c| fitting_height(c, inner_width, measure_leaf))
        .collect();

    match brick.height_resolver() {
        Some(resolve) => {
            let h = resolve(width, &heights, &metrics);
            tracing::trace!(brick = brick.name(), width, height = h, "resolved height");
            h
        }
        None => stacked_height(brick.layout().map(|l| l.axis).unwrap_or_default(), &heights, &metrics),
    }
}

fn stacked_height(axis: Axis, heights: &[f64], metrics: &LayoutMetrics) -> f64 {
    let content = match axis {
        Axis::Vertical => {
            let gaps = heights.len().saturating_sub(1) as f64;
            heights.iter().sum::<f64>() + metrics.vertical * gaps
        }
        Axis::Horizontal => heights.iter().copied().fold(0.0, f64::max),
    };
    content + metrics.inset_height()
}
