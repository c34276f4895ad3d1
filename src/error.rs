use serde_json::Value;
use thiserror::Error;

/// Unified result type for brick construction and decoding.
pub type Result<T> = std::result::Result<T, BrickError>;

/// Everything that can stop a brick from being built or decoded.
///
/// Composition preconditions (`EmptyName`, `DuplicateSibling`,
/// `LayoutMismatch`, `NoSuchChild`) are returned before anything is committed,
/// so the receiving node is never left half-mutated.
#[derive(Debug, Error)]
pub enum BrickError {
    #[error("brick name must not be empty")]
    EmptyName,

    #[error("siblings under `{parent}` must have distinct names, `{name}` appears more than once")]
    DuplicateSibling { parent: String, name: String },

    #[error("layout of `{parent}` does not match its children (missing: {missing:?}, unknown: {unknown:?})")]
    LayoutMismatch {
        parent: String,
        /// children the layout never references
        missing: Vec<String>,
        /// layout references with no matching child
        unknown: Vec<String>,
    },

    #[error("`{parent}` has no child `{child}`")]
    NoSuchChild { parent: String, child: String },

    #[error("invalid type name `{0}`")]
    InvalidTypeName(String),

    #[error("unexpected component name in {0}")]
    UnexpectedComponentName(Value),
}
