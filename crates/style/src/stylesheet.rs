//! Style snapshots attached to layout boxes, and the named style registry.

use crate::border::{Border, Side};
use crate::table::TableStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A named collection of box styles.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stylesheet {
    #[serde(default)]
    pub styles: HashMap<String, Arc<BoxStyle>>,
}

impl Stylesheet {
    /// Looks up a style by its class name.
    pub fn get_style_by_class_name(&self, class_name: &str) -> Option<&Arc<BoxStyle>> {
        self.styles.get(class_name)
    }

    /// Folds the named styles (in order) and an optional override into one snapshot.
    /// Unknown class names are skipped.
    pub fn resolve(&self, class_names: &[String], style_override: Option<&BoxStyle>) -> BoxStyle {
        let mut resolved = BoxStyle::default();
        for name in class_names {
            if let Some(style) = self.get_style_by_class_name(name) {
                resolved.merge(style);
            }
        }
        if let Some(o) = style_override {
            resolved.merge(o);
        }
        resolved
    }
}

/// The resolved style of a single box.
///
/// Border sides are optional: `None` means "not specified on this box", which
/// matters to the collapsing border model where explicitly set cell borders
/// take precedence over inherited ones.
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BoxStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(flatten)]
    pub table: TableStyle,
}

impl BoxStyle {
    /// The border specified for `side`; a side-specific value overrides the shorthand.
    pub fn border_side(&self, side: Side) -> Option<Border> {
        let specific = match side {
            Side::Top => self.border_top,
            Side::Right => self.border_right,
            Side::Bottom => self.border_bottom,
            Side::Left => self.border_left,
        };
        specific.or(self.border)
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_border_side(mut self, side: Side, border: Border) -> Self {
        let slot = match side {
            Side::Top => &mut self.border_top,
            Side::Right => &mut self.border_right,
            Side::Bottom => &mut self.border_bottom,
            Side::Left => &mut self.border_left,
        };
        *slot = Some(border);
        self
    }

    /// Overlays the specified properties of `other` onto `self`.
    ///
    /// Table properties are not optional, so each one is taken from `other`
    /// only when it differs from its default.
    pub fn merge(&mut self, other: &BoxStyle) {
        if other.border.is_some() {
            self.border = other.border;
            // A later shorthand resets earlier side-specific values.
            self.border_top = None;
            self.border_right = None;
            self.border_bottom = None;
            self.border_left = None;
        }
        self.border_top = other.border_top.or(self.border_top);
        self.border_right = other.border_right.or(self.border_right);
        self.border_bottom = other.border_bottom.or(self.border_bottom);
        self.border_left = other.border_left.or(self.border_left);

        self.table.merge(&other.table);
    }
}
