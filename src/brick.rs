//! The component tree node.
//!
//! A [`Brick`] names a component, says which view type it materializes into,
//! and optionally owns child bricks together with the [`Layout`] that
//! arranges them. Trees are composed leaves first through consuming `with_*`
//! calls, or decoded from a document (see [`codec`]).
//!
//! Identity is the name: two bricks are equal, and hash the same, iff their
//! names match, regardless of children, style or layout. Use
//! [`Brick::structurally_eq`] for a deep comparison.
pub mod codec;
pub mod key;

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::appearance::Appearance;
use crate::error::{BrickError, Result};
use crate::layout::{Alignment, Axis, Distribution, Layout};
use crate::metrics::LayoutMetrics;
use crate::registry::{TypeRef, is_valid_type_name};

pub use key::BrickKey;

/// Computes a node's height from its already-measured children:
/// `(fitting_width, child_heights, metrics) -> height`.
pub type HeightResolver = Arc<dyn Fn(f64, &[f64], &LayoutMetrics) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct Brick {
    name: String,
    target: TypeRef,
    nib_name: Option<String>,
    style: Vec<Appearance>,
    components: Option<Vec<Brick>>,
    layout: Option<Layout>,
    width: Option<f64>,
    height: Option<f64>,
    height_resolver: Option<HeightResolver>,
    outlet: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

impl Brick {
    /// A plain brick of the default view type.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::of_type(name, TypeRef::default_view())
    }

    /// A brick materializing into `target`.
    ///
    /// A `target` without view capability is replaced by the default view
    /// type and reported; construction carries on.
    pub fn of_type(name: impl Into<String>, target: TypeRef) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BrickError::EmptyName);
        }
        let target = if !is_valid_type_name(target.name()) {
            tracing::warn!(brick = %name, target = %target, "target is not a valid type name, using default");
            TypeRef::default_view()
        } else if !target.is_view() {
            tracing::warn!(brick = %name, target = %target, "target is not a view type, using default");
            TypeRef::default_view()
        } else {
            target
        };
        Ok(Self {
            name,
            target,
            nib_name: None,
            style: Vec::new(),
            components: None,
            layout: None,
            width: None,
            height: None,
            height_resolver: None,
            outlet: None,
        })
    }

    /// A template-backed brick. With no `nib_name`, or an empty one, this is
    /// a plain [`Brick::of_type`] build; only the empty name is reported.
    pub fn from_nib(name: impl Into<String>, target: TypeRef, nib_name: Option<&str>) -> Result<Self> {
        let mut out = Self::of_type(name, target)?;
        match nib_name {
            Some("") => tracing::warn!(brick = %out.name, "empty nib name, building without template"),
            Some(nib) => out.nib_name = Some(nib.to_string()),
            None => {}
        }
        Ok(out)
    }

    /// Single-child wrapper: horizontal, fill/fill, default metrics.
    pub fn container(name: impl Into<String>, within: Brick) -> Result<Self> {
        Self::union(
            name,
            vec![within],
            Axis::Horizontal,
            Alignment::Fill,
            Distribution::Fill,
            LayoutMetrics::default(),
        )
    }

    /// N-ary composition; the layout references `children` in order.
    pub fn union(
        name: impl Into<String>,
        children: Vec<Brick>,
        axis: Axis,
        align: Alignment,
        distribution: Distribution,
        metrics: LayoutMetrics,
    ) -> Result<Self> {
        let layout = Layout::new(children.iter().map(|c| c.name.as_str()), axis, align, distribution, metrics);
        Self::new(name)?.with_components(children, layout)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FLUENT MUTATORS
// ————————————————————————————————————————————————————————————————————————————

impl Brick {
    pub fn with_style(mut self, style: Vec<Appearance>) -> Self {
        self.style = style;
        self
    }

    pub fn with_height_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(f64, &[f64], &LayoutMetrics) -> f64 + Send + Sync + 'static,
    {
        self.height_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn without_height_resolver(mut self) -> Self {
        self.height_resolver = None;
        self
    }

    /// Attach children and the layout arranging them.
    ///
    /// Fails when two children share a name, or when `layout` does not
    /// reference exactly the children's names. Nothing is committed on
    /// failure. An empty `children` list leaves the brick a leaf, as a
    /// decoded document would.
    pub fn with_components(mut self, children: Vec<Brick>, layout: Layout) -> Result<Self> {
        check_siblings(&self.name, &children)?;
        check_layout(&self.name, &children, &layout)?;
        self.components = Some(children).filter(|c| !c.is_empty());
        self.layout = Some(layout);
        Ok(self)
    }

    /// Attach a fixed number of children, deriving the layout from their
    /// names with `layout` (see [`crate::layout::factory`]).
    pub fn with_components_by<const N: usize, F>(self, children: [Brick; N], layout: F) -> Result<Self>
    where
        F: FnOnce([&str; N]) -> Layout,
    {
        let layout = layout(std::array::from_fn(|i| children[i].name.as_str()));
        self.with_components(children.into(), layout)
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_outlet(mut self, key: impl Into<String>) -> Self {
        self.outlet = Some(key.into());
        self
    }

    /// Swap the child called `name` for `child`.
    ///
    /// When `child` has a different name the layout reference is renamed in
    /// place; the new name must not collide with another sibling.
    pub fn replace_child(self, name: &str, child: Brick) -> Result<Self> {
        let index = self
            .child_index(name)
            .ok_or_else(|| BrickError::NoSuchChild { parent: self.name.clone(), child: name.to_string() })?;
        self.replace_child_at(index, child)
    }

    pub fn replace_child_at(mut self, index: usize, child: Brick) -> Result<Self> {
        let Some(children) = self.components.as_mut().filter(|c| index < c.len()) else {
            return Err(BrickError::NoSuchChild { parent: self.name.clone(), child: format!("#{index}") });
        };
        let collides = children
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.name == child.name);
        if collides {
            return Err(BrickError::DuplicateSibling { parent: self.name.clone(), name: child.name });
        }
        let old = std::mem::replace(&mut children[index], child);
        let new_name = &children[index].name;
        if old.name != *new_name {
            if let Some(layout) = self.layout.as_mut() {
                for reference in layout.components.iter_mut().filter(|r| **r == old.name) {
                    *reference = new_name.clone();
                }
            }
        }
        Ok(self)
    }
}

fn check_siblings(parent: &str, children: &[Brick]) -> Result<()> {
    let mut seen = HashSet::with_capacity(children.len());
    for c in children {
        if !seen.insert(c.name.as_str()) {
            return Err(BrickError::DuplicateSibling { parent: parent.to_string(), name: c.name.clone() });
        }
    }
    Ok(())
}

fn check_layout(parent: &str, children: &[Brick], layout: &Layout) -> Result<()> {
    let names: HashSet<&str> = children.iter().map(|c| c.name.as_str()).collect();
    let refs: HashSet<&str> = layout.components.iter().map(String::as_str).collect();
    let missing: Vec<String> = children
        .iter()
        .filter(|c| !refs.contains(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect();
    let unknown: Vec<String> = layout
        .components
        .iter()
        .filter(|r| !names.contains(r.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() && unknown.is_empty() && layout.components.len() == children.len() {
        return Ok(());
    }
    Err(BrickError::LayoutMismatch { parent: parent.to_string(), missing, unknown })
}

// ————————————————————————————————————————————————————————————————————————————
// ACCESSORS & TRAVERSAL
// ————————————————————————————————————————————————————————————————————————————

impl Brick {
    pub fn name(&self) -> &str { &self.name }
    pub fn target(&self) -> &TypeRef { &self.target }
    pub fn nib_name(&self) -> Option<&str> { self.nib_name.as_deref() }
    pub fn style(&self) -> &[Appearance] { &self.style }
    pub fn components(&self) -> Option<&[Brick]> { self.components.as_deref() }
    pub fn layout(&self) -> Option<&Layout> { self.layout.as_ref() }
    pub fn width(&self) -> Option<f64> { self.width }
    pub fn height(&self) -> Option<f64> { self.height }
    pub fn height_resolver(&self) -> Option<&HeightResolver> { self.height_resolver.as_ref() }
    pub fn outlet(&self) -> Option<&str> { self.outlet.as_deref() }

    pub fn children(&self) -> &[Brick] {
        self.components.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&Brick> {
        self.children().iter().find(|c| c.name == name)
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.children().iter().position(|c| c.name == name)
    }

    /// Depth-first search, starting with `self`.
    pub fn find(&self, name: &str) -> Option<&Brick> {
        self.walk().find(|b| b.name == name)
    }

    /// Whether this tree has a node built for `key`.
    pub fn contains_key<K: BrickKey>(&self, key: &K) -> bool {
        self.find(key.brick_name()).is_some()
    }

    /// Pre-order traversal of the tree rooted here.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Field-by-field comparison of the whole tree. The height resolver has
    /// no comparable representation and is ignored.
    pub fn structurally_eq(&self, other: &Brick) -> bool {
        self.name == other.name
            && self.target == other.target
            && self.nib_name == other.nib_name
            && self.style == other.style
            && self.layout == other.layout
            && self.width == other.width
            && self.height == other.height
            && self.outlet == other.outlet
            && self.children().len() == other.children().len()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.structurally_eq(b))
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Brick>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Brick;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children().iter().rev());
        Some(next)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IDENTITY
// ————————————————————————————————————————————————————————————————————————————

impl PartialEq for Brick {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Brick {}

impl Hash for Brick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<str> for Brick {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Brick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brick")
            .field("name", &self.name)
            .field("target", &self.target.name())
            .field("nib_name", &self.nib_name)
            .field("style", &self.style)
            .field("components", &self.components)
            .field("layout", &self.layout)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("height_resolver", &self.height_resolver.as_ref().map(|_| "<fn>"))
            .field("outlet", &self.outlet)
            .finish()
    }
}
