//! Brick ⇄ JSON document.
//!
//! Decoding is strict about exactly one thing, the node's `name`. Every
//! other field is optional and tolerant: a missing or malformed value is
//! treated as absent, and a child that fails to decode is dropped without
//! failing its parent. The height resolver has no document form and never
//! survives a round-trip.
use std::collections::HashSet;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::Brick;
use crate::appearance;
use crate::error::{BrickError, Result};
use crate::layout::Layout;
use crate::registry::TypeRegistry;

mod field {
    pub const NAME: &str = "name";
    pub const TARGET_CLASS: &str = "targetClass";
    pub const NIB_NAME: &str = "nibName";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const STYLE: &str = "style";
    pub const LAYOUT: &str = "layout";
    pub const COMPONENTS: &str = "components";
    pub const OUTLET: &str = "outlet";
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

impl Brick {
    /// Decode against the process-wide type registry (see
    /// [`TypeRegistry::register_global`]).
    pub fn decode(json: &Value) -> Result<Brick> {
        TypeRegistry::with_global(|types| Self::decode_with(json, types))
    }

    pub fn decode_with(json: &Value, types: &TypeRegistry) -> Result<Brick> {
        let fields = json
            .as_object()
            .ok_or_else(|| BrickError::UnexpectedComponentName(json.clone()))?;
        let name = fields
            .get(field::NAME)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BrickError::UnexpectedComponentName(json.clone()))?;

        let target = match fields.get(field::TARGET_CLASS).and_then(Value::as_str) {
            Some(type_name) => types.resolve_view(type_name),
            None => Default::default(),
        };
        let nib_name = fields
            .get(field::NIB_NAME)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        let mut out = Brick::of_type(name, target)?;
        out.nib_name = nib_name.map(str::to_string);

        if let Some(style) = fields.get(field::STYLE).and_then(Value::as_object) {
            out.style = appearance::from_json(style);
        }

        if let Some(children) = fields.get(field::COMPONENTS).and_then(Value::as_array) {
            let children = decode_children(name, children, types);
            if !children.is_empty() {
                out.components = Some(children);
            }
        }

        out.layout = fields
            .get(field::LAYOUT)
            .and_then(|v| match serde_json::from_value::<Layout>(v.clone()) {
                Ok(layout) => Some(layout),
                Err(error) => {
                    tracing::debug!(brick = name, %error, "ignoring malformed layout");
                    None
                }
            });
        repair_layout(&mut out);

        out.width = fields.get(field::WIDTH).and_then(Value::as_f64);
        out.height = fields.get(field::HEIGHT).and_then(Value::as_f64);
        out.outlet = fields.get(field::OUTLET).and_then(Value::as_str).map(str::to_string);

        Ok(out)
    }
}

fn decode_children(parent: &str, docs: &[Value], types: &TypeRegistry) -> Vec<Brick> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let child = match Brick::decode_with(doc, types) {
            Ok(child) => child,
            Err(error) => {
                tracing::debug!(brick = parent, %error, "dropping undecodable child");
                continue;
            }
        };
        if !seen.insert(child.name.clone()) {
            tracing::warn!(brick = parent, child = %child.name, "dropping duplicate sibling");
            continue;
        }
        out.push(child);
    }
    out
}

/// Make the decoded layout reference exactly the decoded children: stale
/// references go, unreferenced children are appended, and children without
/// any layout get the container default.
fn repair_layout(brick: &mut Brick) {
    let names: Vec<&str> = brick.components.iter().flatten().map(|c| c.name.as_str()).collect();
    if let Some(layout) = brick.layout.as_mut() {
        let mut kept = HashSet::new();
        layout
            .components
            .retain(|r| names.contains(&r.as_str()) && kept.insert(r.clone()));
        for name in &names {
            if !kept.contains(*name) {
                layout.components.push(name.to_string());
            }
        }
    } else if !names.is_empty() {
        brick.layout = Some(Layout::horizontal(names));
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENCODE
// ————————————————————————————————————————————————————————————————————————————

impl Brick {
    pub fn encode(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert(field::NAME.into(), Value::from(self.name.as_str()));
        json.insert(field::TARGET_CLASS.into(), Value::from(self.target.name()));

        if let Some(nib_name) = &self.nib_name {
            json.insert(field::NIB_NAME.into(), Value::from(nib_name.as_str()));
        }
        // JSON has no NaN or infinity; `Number::from_f64` refuses them.
        if let Some(width) = self.width.and_then(serde_json::Number::from_f64) {
            json.insert(field::WIDTH.into(), Value::Number(width));
        }
        if let Some(height) = self.height.and_then(serde_json::Number::from_f64) {
            json.insert(field::HEIGHT.into(), Value::Number(height));
        }
        if let Some(layout) = &self.layout {
            match serde_json::to_value(layout) {
                Ok(v) => {
                    json.insert(field::LAYOUT.into(), v);
                }
                Err(error) => tracing::warn!(brick = %self.name, %error, "layout not encodable, skipping"),
            }
        }
        if !self.style.is_empty() {
            json.insert(field::STYLE.into(), Value::Object(appearance::to_json(&self.style)));
        }
        let components: Vec<Value> = self.children().iter().map(|c| Value::Object(c.encode())).collect();
        if !components.is_empty() {
            json.insert(field::COMPONENTS.into(), Value::Array(components));
        }
        if let Some(outlet) = &self.outlet {
            json.insert(field::OUTLET.into(), Value::from(outlet.as_str()));
        }
        json
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.encode())
    }
}

impl Serialize for Brick {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Brick {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        Brick::decode(&json).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::Appearance;
    use crate::layout::{Alignment, Axis, Distribution};
    use crate::metrics::LayoutMetrics;
    use crate::registry::TypeRef;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_tree() -> Brick {
        let title = Brick::of_type("title", TypeRef::view("Label"))
            .unwrap()
            .with_style(vec![Appearance::new("font", "body"), Appearance::new("numberOfLines", 0)])
            .with_outlet("titleLabel");
        let icon = Brick::from_nib("icon", TypeRef::view("ImageView"), Some("IconView"))
            .unwrap()
            .with_width(24.0)
            .with_height(24.0);
        Brick::union(
            "row",
            vec![icon, title],
            Axis::Horizontal,
            Alignment::Center,
            Distribution::Fill,
            LayoutMetrics::uniform(8.0).with_spacing(4.0, 0.0),
        )
        .unwrap()
        .with_height(44.0)
    }

    #[test]
    fn encode_emits_expected_document() {
        let doc = sample_tree().to_value();
        assert_eq!(
            doc,
            json!({
                "name": "row",
                "targetClass": "View",
                "height": 44.0,
                "layout": {
                    "components": ["icon", "title"],
                    "axis": "horizontal",
                    "align": "center",
                    "distribution": "fill",
                    "metrics": {"top": 8.0, "left": 8.0, "bottom": 8.0, "right": 8.0, "horizontal": 4.0, "vertical": 0.0}
                },
                "components": [
                    {"name": "icon", "targetClass": "ImageView", "nibName": "IconView", "width": 24.0, "height": 24.0},
                    {"name": "title", "targetClass": "Label", "style": {"font": "body", "numberOfLines": 0}, "outlet": "titleLabel"}
                ]
            })
        );
    }

    #[test]
    fn key_order_is_stable() {
        let doc = sample_tree().encode();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "targetClass", "height", "layout", "components"]);
    }

    #[test]
    fn round_trip_is_structural() {
        let tree = sample_tree().with_height_resolver(|_, hs, _| hs.iter().sum());
        let back = Brick::decode(&tree.to_value()).unwrap();
        assert!(back.structurally_eq(&tree));
        assert!(back.height_resolver().is_none());
    }

    #[test]
    fn empty_style_is_omitted() {
        let doc = Brick::new("plain").unwrap().with_style(vec![]).encode();
        assert!(!doc.contains_key("style"));
        assert!(!doc.contains_key("components"));
        assert!(!doc.contains_key("layout"));
    }

    #[test]
    fn missing_name_is_an_error() {
        let doc = json!({"targetClass": "Label"});
        match Brick::decode(&doc) {
            Err(BrickError::UnexpectedComponentName(fragment)) => assert_eq!(fragment, doc),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(Brick::decode(&json!({"name": 3})).is_err());
        assert!(Brick::decode(&json!({"name": ""})).is_err());
        assert!(Brick::decode(&json!(["name"])).is_err());
    }

    #[test]
    fn nameless_child_is_dropped() {
        let root = Brick::decode(&json!({"name": "root", "components": [{"targetClass": "Bogus"}]})).unwrap();
        assert_eq!(root.name(), "root");
        assert!(root.components().is_none());
        assert!(root.layout().is_none());
    }

    #[test]
    fn malformed_grandchild_only_loses_its_subtree() {
        let root = Brick::decode(&json!({
            "name": "root",
            "components": [
                {"name": "a", "components": [{"name": "a1"}, {"oops": true}]},
                {"name": "b"}
            ],
            "layout": {"components": ["a", "b"], "axis": "vertical"}
        }))
        .unwrap();
        assert_eq!(root.children().len(), 2);
        let a = root.child("a").unwrap();
        assert_eq!(a.children().len(), 1);
        assert_eq!(a.layout().unwrap().components, vec!["a1"]);
        assert_eq!(root.layout().unwrap().axis, Axis::Vertical);
    }

    #[test]
    fn unknown_type_falls_back_to_default() {
        let b = Brick::decode(&json!({"name": "x", "targetClass": "NoSuchType"})).unwrap();
        assert_eq!(b.target(), &TypeRef::default_view());
        let b = Brick::decode(&json!({"name": "x", "targetClass": "Font"})).unwrap();
        assert_eq!(b.target(), &TypeRef::default_view());
        let b = Brick::decode(&json!({"name": "x", "targetClass": 12})).unwrap();
        assert_eq!(b.target(), &TypeRef::default_view());
    }

    #[test]
    fn custom_registry_resolves_app_types() {
        let mut types = TypeRegistry::standard();
        types.register_view("AvatarView").unwrap();
        let doc = json!({"name": "avatar", "targetClass": "AvatarView"});
        assert_eq!(Brick::decode_with(&doc, &types).unwrap().target().name(), "AvatarView");
        assert_eq!(Brick::decode(&doc).unwrap().target().name(), "View");
    }

    #[test]
    fn malformed_optional_fields_are_ignored() {
        let b = Brick::decode(&json!({
            "name": "x",
            "nibName": "",
            "width": "wide",
            "height": 12,
            "style": ["not", "an", "object"],
            "layout": {"axis": 7},
            "components": {"name": "not-a-list"},
            "outlet": false
        }))
        .unwrap();
        assert_eq!(b.nib_name(), None);
        assert_eq!(b.width(), None);
        assert_eq!(b.height(), Some(12.0));
        assert!(b.style().is_empty());
        assert!(b.layout().is_none());
        assert!(b.components().is_none());
        assert_eq!(b.outlet(), None);
    }

    #[test]
    fn decoded_layout_is_reconciled_with_children() {
        let b = Brick::decode(&json!({
            "name": "p",
            "components": [{"name": "a"}, {"name": "b"}, {"name": "a"}, {"name": "c"}],
            "layout": {"components": ["c", "ghost", "a", "c"], "axis": "vertical"}
        }))
        .unwrap();
        let names: Vec<&str> = b.children().iter().map(Brick::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(b.layout().unwrap().components, vec!["c", "a", "b"]);

        let b = Brick::decode(&json!({"name": "p", "components": [{"name": "a"}]})).unwrap();
        assert_eq!(b.layout(), Some(&Layout::horizontal(["a"])));
    }

    #[test]
    fn non_finite_sizes_are_skipped() {
        let doc = Brick::new("x").unwrap().with_width(f64::NAN).with_height(f64::INFINITY).encode();
        assert!(!doc.contains_key("width"));
        assert!(!doc.contains_key("height"));
    }

    #[test]
    fn non_finite_metrics_keep_the_rest_of_the_layout() {
        let metrics = LayoutMetrics { top: f64::NAN, left: 6.0, ..LayoutMetrics::default() };
        let col = Brick::union(
            "col",
            vec![Brick::new("a").unwrap(), Brick::new("b").unwrap()],
            Axis::Vertical,
            Alignment::Center,
            Distribution::EqualSpacing,
            metrics,
        )
        .unwrap();
        let doc = col.to_value();
        assert_eq!(doc["layout"]["metrics"].get("top"), None);

        let back = Brick::decode(&doc).unwrap();
        let layout = back.layout().unwrap();
        assert_eq!(layout.axis, Axis::Vertical);
        assert_eq!(layout.align, Alignment::Center);
        assert_eq!(layout.distribution, Distribution::EqualSpacing);
        assert_eq!(layout.metrics.top, 0.0);
        assert_eq!(layout.metrics.left, 6.0);

        let doc = json!({"name": "p", "layout": {"axis": "vertical", "metrics": {"top": null}}});
        assert_eq!(Brick::decode(&doc).unwrap().layout().unwrap().axis, Axis::Vertical);
    }

    #[test]
    fn childless_layout_drops_stale_references() {
        let doc = json!({"name": "p", "layout": {"components": ["ghost"], "axis": "vertical"}});
        let b = Brick::decode(&doc).unwrap();
        assert!(b.components().is_none());
        let layout = b.layout().unwrap();
        assert!(layout.components.is_empty());
        assert_eq!(layout.axis, Axis::Vertical);
    }

    #[test]
    fn globally_registered_types_survive_a_round_trip() {
        TypeRegistry::register_global(TypeRef::view("App.AvatarBadge")).unwrap();
        let avatar = Brick::of_type("avatar", TypeRef::view("App.AvatarBadge")).unwrap();
        let cell = Brick::container("cell", avatar).unwrap();

        let back = Brick::decode(&cell.to_value()).unwrap();
        assert!(back.structurally_eq(&cell));
        assert_eq!(back.child("avatar").unwrap().target().name(), "App.AvatarBadge");

        let back: Brick = serde_json::from_str(&serde_json::to_string(&cell).unwrap()).unwrap();
        assert!(back.structurally_eq(&cell));
        assert_eq!(back.child("avatar").unwrap().target().name(), "App.AvatarBadge");
    }

    #[test]
    fn serde_impls_follow_the_codec() {
        let tree = sample_tree();
        let text = serde_json::to_string(&tree).unwrap();
        let back: Brick = serde_json::from_str(&text).unwrap();
        assert!(back.structurally_eq(&tree));
        assert!(serde_json::from_str::<Brick>(r#"{"width": 3}"#).is_err());
    }
}
