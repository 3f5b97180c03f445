//! Low-level nom parser functions for CSS-like style values.
//!
//! Covers lengths, colors, borders and the table keywords. The
//! [`apply_style_property`] dispatcher maps a property name to its parser.

use crate::border::{Border, BorderStyle};
use crate::stylesheet::BoxStyle;
use crate::table::{BorderCollapse, EmptyCells, TableLayout};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n, take_while1};
use nom::character::complete::{char, space0};
use nom::combinator::{map, map_res, opt, recognize, value};
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use tabula_types::Color;
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Unknown style property: '{0}'")]
    UnknownProperty(String),
}

// --- Helper Parsers ---

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(take_while1(is_digit), opt(pair(char('.'), take_while1(is_digit))))),
                recognize(pair(char('.'), take_while1(is_digit))),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

// --- Unit & Length Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("pt")),
        value(1.0, tag_no_case("px")), // Treat px as pt
        value(72.0, tag_no_case("in")),
        value(28.35, tag_no_case("cm")),
        value(2.835, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm"), in points.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, number) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, number * unit_multiplier.unwrap_or(1.0)))
}

// --- Color & Border Parsers ---

fn hex_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 6, |c: char| c.is_ascii_hexdigit()).parse(input)
}

/// Parses a hex color (e.g., "#FF0000" or "#F00").
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    map_res(preceded(char('#'), hex_digits), |digits: &str| {
        Color::parse_hex(&format!("#{}", digits))
    })
    .parse(input)
}

/// Parses a border style keyword.
pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        value(BorderStyle::Solid, tag_no_case("solid")),
        value(BorderStyle::Dashed, tag_no_case("dashed")),
        value(BorderStyle::Dotted, tag_no_case("dotted")),
        value(BorderStyle::Double, tag_no_case("double")),
        value(BorderStyle::Hidden, tag_no_case("hidden")),
        value(BorderStyle::None, tag_no_case("none")),
    ))
    .parse(input)
}

/// Parses a CSS border shorthand (e.g., "2pt solid #00ff00").
///
/// The color may be omitted (defaults to black); `none` and `hidden` may be
/// given alone.
pub fn parse_border(input: &str) -> IResult<&str, Border> {
    alt((
        map(
            (ws(parse_length), ws(parse_border_style), opt(ws(parse_color))),
            |(width, style, color)| Border {
                width,
                style,
                color: color.unwrap_or_default(),
            },
        ),
        map(ws(parse_border_style), |style| Border {
            width: 0.0,
            style,
            color: Color::default(),
        }),
    ))
    .parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- Keyword Parse Functions ---

pub fn parse_border_collapse(s: &str) -> Result<BorderCollapse, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "separate" => Ok(BorderCollapse::Separate),
        "collapse" => Ok(BorderCollapse::Collapse),
        _ => Err(StyleParseError::InvalidValue {
            property: "border-collapse".to_string(),
            value: s.to_string(),
        }),
    }
}

pub fn parse_table_layout(s: &str) -> Result<TableLayout, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "auto" => Ok(TableLayout::Auto),
        "fixed" => Ok(TableLayout::Fixed),
        _ => Err(StyleParseError::InvalidValue {
            property: "table-layout".to_string(),
            value: s.to_string(),
        }),
    }
}

pub fn parse_empty_cells(s: &str) -> Result<EmptyCells, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "show" => Ok(EmptyCells::Show),
        "hide" => Ok(EmptyCells::Hide),
        _ => Err(StyleParseError::InvalidValue {
            property: "empty-cells".to_string(),
            value: s.to_string(),
        }),
    }
}

// --- High-level Style Application ---

/// Applies a single CSS-like property to a `BoxStyle`.
pub fn apply_style_property(
    style: &mut BoxStyle,
    attr_name: &str,
    value: &str,
) -> Result<(), StyleParseError> {
    match attr_name {
        "border" => style.border = Some(run_parser(parse_border, value)?),
        "border-top" => style.border_top = Some(run_parser(parse_border, value)?),
        "border-right" => style.border_right = Some(run_parser(parse_border, value)?),
        "border-bottom" => style.border_bottom = Some(run_parser(parse_border, value)?),
        "border-left" => style.border_left = Some(run_parser(parse_border, value)?),
        "border-collapse" => style.table.border_collapse = parse_border_collapse(value)?,
        "border-spacing" | "row-spacing" => {
            style.table.row_spacing = run_parser(parse_length, value)?
        }
        "table-layout" => style.table.table_layout = parse_table_layout(value)?,
        "empty-cells" => style.table.empty_cells = parse_empty_cells(value)?,
        _ => return Err(StyleParseError::UnknownProperty(attr_name.to_string())),
    }
    Ok(())
}
