use crate::parsers::{StyleParseError, parse_border, run_parser};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tabula_types::Color;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    /// Like `None`, but wins every conflict in the collapsing border model.
    Hidden,
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    /// Ranking used to break ties between equally wide collapsed borders.
    pub fn rank(self) -> u8 {
        match self {
            BorderStyle::Double => 4,
            BorderStyle::Solid => 3,
            BorderStyle::Dashed => 2,
            BorderStyle::Dotted => 1,
            BorderStyle::Hidden | BorderStyle::None => 0,
        }
    }

    /// `none` and `hidden` draw nothing.
    pub fn is_visible(self) -> bool {
        !matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

impl FromStr for BorderStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(BorderStyle::None),
            "hidden" => Ok(BorderStyle::Hidden),
            "solid" => Ok(BorderStyle::Solid),
            "dashed" => Ok(BorderStyle::Dashed),
            "dotted" => Ok(BorderStyle::Dotted),
            "double" => Ok(BorderStyle::Double),
            _ => Err(StyleParseError::InvalidValue {
                property: "border-style".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// One border edge as specified by a style, width in points.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Border {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Color,
}

impl Eq for Border {}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.style.hash(state);
        self.color.hash(state);
    }
}

impl Border {
    pub fn new(width: f32, style: BorderStyle, color: Color) -> Self {
        Self { width, style, color }
    }

    pub fn solid(width: f32) -> Self {
        Self::new(width, BorderStyle::Solid, Color::BLACK)
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn hidden() -> Self {
        Self::new(0.0, BorderStyle::Hidden, Color::BLACK)
    }
}

impl FromStr for Border {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        run_parser(parse_border, s)
    }
}

/// Accepts either a CSS shorthand string (`"1pt solid #000"`) or a map.
impl<'de> Deserialize<'de> for Border {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BorderDef {
            Shorthand(String),
            Map {
                #[serde(default)]
                width: f32,
                #[serde(default)]
                style: BorderStyle,
                #[serde(default)]
                color: Color,
            },
        }

        match BorderDef::deserialize(deserializer)? {
            BorderDef::Shorthand(s) => s.parse().map_err(|e: StyleParseError| {
                de::Error::custom(format!("invalid border string: '{}' ({})", s, e))
            }),
            BorderDef::Map { width, style, color } => Ok(Border { width, style, color }),
        }
    }
}

/// The four edges of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_from_shorthand() {
        let b: Border = "2pt dashed #ff0000".parse().unwrap();
        assert_eq!(b, Border::new(2.0, BorderStyle::Dashed, Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_border_deserializes_from_string_and_map() {
        let b: Border = serde_json::from_str(r##""1pt solid #000""##).unwrap();
        assert_eq!(b, Border::solid(1.0));

        let b: Border =
            serde_json::from_str(r##"{ "width": 3.0, "style": "double", "color": "#00f" }"##)
                .unwrap();
        assert_eq!(b, Border::new(3.0, BorderStyle::Double, Color::rgb(0, 0, 255)));

        assert!(serde_json::from_str::<Border>(r#""thick wobbly""#).is_err());
    }

    #[test]
    fn test_style_rank_and_visibility() {
        assert!(BorderStyle::Double.rank() > BorderStyle::Solid.rank());
        assert!(BorderStyle::Solid.rank() > BorderStyle::Dashed.rank());
        assert!(BorderStyle::Dashed.rank() > BorderStyle::Dotted.rank());
        assert!(!BorderStyle::Hidden.is_visible());
        assert!(!BorderStyle::None.is_visible());
        assert_eq!("HIDDEN".parse::<BorderStyle>().unwrap(), BorderStyle::Hidden);
    }

    #[test]
    fn test_side_opposite() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
        }
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
