//! Declarative component trees ("bricks") with a JSON round-trip.
//!
//! A [`Brick`] names a component, references the view type it becomes, and
//! may own children arranged by a [`Layout`]. Trees are built top-down with
//! consuming `with_*` calls, or decoded from documents with
//! [`Brick::decode`]; both produce the same shape, which a renderer walks to
//! instantiate real views.
//!
//! ```ignore
//! use json_brick::{Brick, TypeRef, Axis, Alignment, Distribution, LayoutMetrics};
//!
//! let title = Brick::of_type("title", TypeRef::view("Label"))?.with_outlet("titleLabel");
//! let cell = Brick::union("cell", vec![title], Axis::Vertical, Alignment::Fill,
//!                         Distribution::Fill, LayoutMetrics::uniform(12.0))?;
//! let doc = cell.to_value();
//! assert!(Brick::decode(&doc)?.structurally_eq(&cell));
//! ```
pub mod appearance;
pub mod brick;
pub mod cli;
pub mod document;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod registry;
pub mod select;
pub mod sizing;

pub use appearance::Appearance;
pub use brick::{Brick, BrickKey, HeightResolver, Walk};
pub use error::{BrickError, Result};
pub use layout::{Alignment, Axis, Distribution, Layout};
pub use metrics::LayoutMetrics;
pub use registry::{Capability, TypeRef, TypeRegistry};
