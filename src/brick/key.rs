//! Builder keys: closed sets of named component kinds.
//!
//! A key's name is the name of the brick it builds, so keys and built bricks
//! compare equal and hash the same. "Does this tree already have a node for
//! key K?" is then a plain name lookup ([`Brick::contains_key`], or
//! `set.contains(k.brick_name())` on a `HashSet<Brick>`).
//!
//! Declare a key set with [`brick_keys!`](crate::brick_keys):
//!
//! ```ignore
//! json_brick::brick_keys! {
//!     pub enum FeedCell {
//!         Avatar => "ImageView",
//!         Title => "Label",
//!         Divider,
//!     }
//! }
//!
//! let title = FeedCell::Title.build(None)?;
//! assert!(title == FeedCell::Title);
//! ```
use super::Brick;
use crate::error::Result;
use crate::registry::{TypeRef, TypeRegistry};

pub trait BrickKey {
    fn brick_name(&self) -> &str;

    /// Registered type this key builds by default, if any.
    fn type_name(&self) -> Option<&str> {
        None
    }

    fn default_type(&self, types: &TypeRegistry) -> TypeRef {
        self.type_name().map(|n| types.resolve_view(n)).unwrap_or_default()
    }

    /// Build with `target`, or with the key's default type.
    fn build(&self, target: Option<TypeRef>) -> Result<Brick> {
        let target = target.unwrap_or_else(|| TypeRegistry::with_global(|types| self.default_type(types)));
        Brick::of_type(self.brick_name(), target)
    }

    /// Template-backed build. An empty `nib_name` falls back to [`BrickKey::build`].
    fn build_from_nib(&self, target: Option<TypeRef>, nib_name: &str) -> Result<Brick> {
        if nib_name.is_empty() {
            tracing::warn!(key = self.brick_name(), "empty nib name, building without template");
            return self.build(None);
        }
        Brick::from_nib(self.brick_name(), target.unwrap_or_default(), Some(nib_name))
    }
}

/// Declare a closed enum of builder keys.
///
/// Each variant's brick name is the variant identifier; `=> "Type"` gives it
/// a default registered type. Generates [`BrickKey`], name-based `Eq`/`Hash`,
/// and `PartialEq` against [`Brick`] in both directions.
#[macro_export]
macro_rules! brick_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident $(=> $ty:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis enum $name {
            $( $variant, )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant, )*];
        }

        impl $crate::BrickKey for $name {
            fn brick_name(&self) -> &str {
                match self {
                    $( $name::$variant => stringify!($variant), )*
                }
            }

            fn type_name(&self) -> Option<&str> {
                match self {
                    $( $name::$variant => $crate::__brick_key_type!($($ty)?), )*
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::BrickKey::brick_name(self) == $crate::BrickKey::brick_name(other)
            }
        }

        impl Eq for $name {}

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash($crate::BrickKey::brick_name(self), state)
            }
        }

        impl PartialEq<$crate::Brick> for $name {
            fn eq(&self, other: &$crate::Brick) -> bool {
                $crate::BrickKey::brick_name(self) == other.name()
            }
        }

        impl PartialEq<$name> for $crate::Brick {
            fn eq(&self, other: &$name) -> bool {
                self.name() == $crate::BrickKey::brick_name(other)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __brick_key_type {
    () => {
        None
    };
    ($ty:literal) => {
        Some($ty)
    };
}
