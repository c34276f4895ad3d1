//! String → type lookup for `targetClass`.
//!
//! Type references are resolved through an explicit registry populated up
//! front; there is no reflection. Lookups used by construction and decoding
//! are total: a miss, or a hit on a type that cannot be materialized as a
//! view, yields [`TypeRef::default_view`].
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BrickError, Result};

pub const DEFAULT_VIEW: &str = "View";

static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("type name pattern is valid")
});

static GLOBAL: Lazy<RwLock<TypeRegistry>> = Lazy::new(|| RwLock::new(TypeRegistry::standard()));

/// What a registered type can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Can be instantiated as an on-screen view.
    View,
    /// Known to the host but not renderable (colors, fonts, ...).
    Other,
}

/// A resolved type descriptor. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: Arc<str>,
    capability: Capability,
}

impl TypeRef {
    pub fn view(name: impl AsRef<str>) -> Self {
        Self { name: Arc::from(name.as_ref()), capability: Capability::View }
    }

    pub fn other(name: impl AsRef<str>) -> Self {
        Self { name: Arc::from(name.as_ref()), capability: Capability::Other }
    }

    pub fn default_view() -> Self {
        Self::view(DEFAULT_VIEW)
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn capability(&self) -> Capability { self.capability }
    pub fn is_view(&self) -> bool { self.capability == Capability::View }
}

impl Default for TypeRef {
    fn default() -> Self { Self::default_view() }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifier, optionally dotted (`Module.Type`).
pub fn is_valid_type_name(name: &str) -> bool {
    TYPE_NAME.is_match(name)
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeRef>,
}

impl TypeRegistry {
    /// Registry holding only the default view type.
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        types.insert(DEFAULT_VIEW.to_string(), TypeRef::default_view());
        Self { types }
    }

    /// The stock component vocabulary.
    pub fn standard() -> Self {
        let mut out = Self::new();
        let views = [
            "Label", "Button", "ImageView", "TextField", "TextView", "ScrollView",
            "Switch", "StackView", "TableViewCell", "CollectionViewCell",
        ];
        for name in views {
            out.types.insert(name.to_string(), TypeRef::view(name));
        }
        for name in ["Object", "Color", "Font"] {
            out.types.insert(name.to_string(), TypeRef::other(name));
        }
        out
    }

    /// Run `f` against the process-wide registry. It starts out as
    /// [`TypeRegistry::standard`] and is what [`Brick::decode`](crate::Brick::decode)
    /// resolves against.
    pub fn with_global<R>(f: impl FnOnce(&TypeRegistry) -> R) -> R {
        let types = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
        f(&types)
    }

    /// Replace the process-wide registry, typically once at startup.
    pub fn install(types: TypeRegistry) {
        *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = types;
    }

    /// Add a type to the process-wide registry.
    pub fn register_global(ty: TypeRef) -> Result<()> {
        GLOBAL.write().unwrap_or_else(PoisonError::into_inner).register(ty)
    }

    /// Add or replace a type. Names must look like identifiers, optionally
    /// dotted (`Module.Type`).
    pub fn register(&mut self, ty: TypeRef) -> Result<()> {
        if !is_valid_type_name(ty.name()) {
            return Err(BrickError::InvalidTypeName(ty.name().to_string()));
        }
        self.types.insert(ty.name().to_string(), ty);
        Ok(())
    }

    pub fn register_view(&mut self, name: &str) -> Result<()> {
        self.register(TypeRef::view(name))
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeRef> {
        self.types.get(name)
    }

    /// Total lookup: always returns a view-capable type.
    pub fn resolve_view(&self, name: &str) -> TypeRef {
        match self.resolve(name) {
            Some(ty) if ty.is_view() => ty.clone(),
            Some(ty) => {
                tracing::debug!(type_name = name, capability = ?ty.capability(), "not a view type, using default");
                TypeRef::default_view()
            }
            None => {
                tracing::debug!(type_name = name, "unknown type, using default");
                TypeRef::default_view()
            }
        }
    }

    pub fn len(&self) -> usize { self.types.len() }
    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.values()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self { Self::new() }
}
