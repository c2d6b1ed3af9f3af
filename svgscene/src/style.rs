// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::color::{self, Color};
use crate::units;

macro_rules! impl_enum_default {
    ($name:ident, $def_value:ident) => {
        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name::$def_value
            }
        }
    };
}

/// A paint style.
///
/// `paint` value type in the SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// Paint with a color.
    Color(Color),

    /// Paint with the cascaded `color` property value.
    CurrentColor,

    /// Paint using a paint server.
    Link(String),
}

impl Paint {
    /// Parses a paint value.
    ///
    /// `None` stands for `none`; an unrecognized value
    /// is reported as `Err` so the caller can keep its default.
    fn parse(text: &str) -> Result<Option<Paint>, ()> {
        let text = text.trim();
        if text == "none" {
            return Ok(None);
        }

        if text == "currentColor" {
            return Ok(Some(Paint::CurrentColor));
        }

        if let Some(id) = parse_func_iri(text) {
            return Ok(Some(Paint::Link(id)));
        }

        match color::parse_color(text) {
            Some(c) => Ok(Some(Paint::Color(c))),
            None => Err(()),
        }
    }
}

/// A fill rule.
///
/// `fill-rule` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl_enum_default!(FillRule, NonZero);

/// A line cap.
///
/// `stroke-linecap` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl_enum_default!(LineCap, Butt);

/// A line join.
///
/// `stroke-linejoin` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl_enum_default!(LineJoin, Miter);

/// A visibility property.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

impl_enum_default!(Visibility, Visible);

/// A text anchor.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl_enum_default!(TextAnchor, Start);

/// A font style.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl_enum_default!(FontStyle, Normal);

/// Text decoration lines.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct TextDecoration {
    pub underline: bool,
    pub overline: bool,
    pub line_through: bool,
}

impl TextDecoration {
    /// Returns `true` when no decoration line is requested.
    pub fn is_none(&self) -> bool {
        !(self.underline || self.overline || self.line_through)
    }
}

/// A resolved element style.
///
/// Built by cloning the parent style and overlaying the element's
/// presentation attributes, matching stylesheet rules and inline
/// `style=` declarations, in that order.
#[derive(Clone, PartialEq, Debug)]
pub struct Style {
    /// Fill paint. `None` is `fill="none"`.
    pub fill: Option<Paint>,
    /// Fill opacity in 0..1.
    pub fill_opacity: f64,
    /// Fill rule.
    pub fill_rule: FillRule,
    /// Stroke paint. `None` is `stroke="none"`.
    pub stroke: Option<Paint>,
    /// Stroke opacity in 0..1.
    pub stroke_opacity: f64,
    /// Stroke width in user units.
    pub stroke_width: f64,
    /// Stroke line cap.
    pub stroke_linecap: LineCap,
    /// Stroke line join.
    pub stroke_linejoin: LineJoin,
    /// Stroke miter limit, >= 1.
    pub stroke_miterlimit: f64,
    /// Raw `stroke-dasharray` value.
    pub stroke_dasharray: Option<String>,
    /// Stroke dash offset.
    pub stroke_dashoffset: f64,
    /// Group opacity in 0..1. Not inherited.
    pub opacity: f64,
    /// `display != none`. Not inherited.
    pub display: bool,
    /// Element visibility.
    pub visibility: Visibility,
    /// Font family list, as written.
    pub font_family: String,
    /// Font size in user units.
    pub font_size: f64,
    /// Numeric font weight, 100..900.
    pub font_weight: u16,
    /// Font style.
    pub font_style: FontStyle,
    /// Text anchor.
    pub text_anchor: TextAnchor,
    /// Text decoration lines.
    pub text_decoration: TextDecoration,
    /// The `color` property, for `currentColor` resolution.
    pub color: Color,
    /// Referenced clip path id. Not inherited.
    pub clip_path: Option<String>,
    /// Referenced mask id. Not inherited.
    pub mask: Option<String>,
    /// Referenced filter id. Not inherited.
    pub filter: Option<String>,
    /// Referenced start marker id. Not inherited.
    pub marker_start: Option<String>,
    /// Referenced mid marker id. Not inherited.
    pub marker_mid: Option<String>,
    /// Referenced end marker id. Not inherited.
    pub marker_end: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: Some(Paint::Color(Color::black())),
            fill_opacity: 1.0,
            fill_rule: FillRule::default(),
            stroke: None,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
            stroke_linecap: LineCap::default(),
            stroke_linejoin: LineJoin::default(),
            stroke_miterlimit: 4.0,
            stroke_dasharray: None,
            stroke_dashoffset: 0.0,
            opacity: 1.0,
            display: true,
            visibility: Visibility::default(),
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            font_weight: 400,
            font_style: FontStyle::default(),
            text_anchor: TextAnchor::default(),
            text_decoration: TextDecoration::default(),
            color: Color::black(),
            clip_path: None,
            mask: None,
            filter: None,
            marker_start: None,
            marker_mid: None,
            marker_end: None,
        }
    }
}

impl Style {
    /// Returns the style a child element starts the cascade from.
    ///
    /// This is a clone with the non-inherited properties reset,
    /// so per-element effects are not applied again on descendants.
    pub fn inherited(&self) -> Style {
        let mut style = self.clone();
        style.opacity = 1.0;
        style.display = true;
        style.clip_path = None;
        style.mask = None;
        style.filter = None;
        style.marker_start = None;
        style.marker_mid = None;
        style.marker_end = None;
        style
    }

    /// Overlays a single property onto the style.
    ///
    /// Properties that fail to parse keep their current value.
    /// Unknown properties are ignored.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        // `inherit` keeps the cascaded value.
        if value == "inherit" {
            return;
        }

        let font_size = self.font_size;
        match name {
            "fill" => {
                if let Ok(paint) = Paint::parse(value) {
                    self.fill = paint;
                }
            }
            "fill-opacity" => {
                self.fill_opacity = parse_opacity(value, self.fill_opacity);
            }
            "fill-rule" => match value {
                "nonzero" => self.fill_rule = FillRule::NonZero,
                "evenodd" => self.fill_rule = FillRule::EvenOdd,
                _ => {}
            },
            "stroke" => {
                if let Ok(paint) = Paint::parse(value) {
                    self.stroke = paint;
                }
            }
            "stroke-opacity" => {
                self.stroke_opacity = parse_opacity(value, self.stroke_opacity);
            }
            "stroke-width" => {
                let n = units::parse_length(value, self.stroke_width, font_size, 0.0);
                if n > 0.0 {
                    self.stroke_width = n;
                }
            }
            "stroke-linecap" => match value {
                "butt" => self.stroke_linecap = LineCap::Butt,
                "round" => self.stroke_linecap = LineCap::Round,
                "square" => self.stroke_linecap = LineCap::Square,
                _ => {}
            },
            "stroke-linejoin" => match value {
                "miter" => self.stroke_linejoin = LineJoin::Miter,
                "round" => self.stroke_linejoin = LineJoin::Round,
                "bevel" => self.stroke_linejoin = LineJoin::Bevel,
                _ => {}
            },
            "stroke-miterlimit" => {
                let n = units::parse_number(value, self.stroke_miterlimit);
                self.stroke_miterlimit = if n < 1.0 { 1.0 } else { n };
            }
            "stroke-dasharray" => {
                self.stroke_dasharray = if value == "none" {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "stroke-dashoffset" => {
                self.stroke_dashoffset =
                    units::parse_length(value, self.stroke_dashoffset, font_size, 0.0);
            }
            "opacity" => {
                self.opacity = parse_opacity(value, self.opacity);
            }
            "display" => {
                self.display = value != "none";
            }
            "visibility" => match value {
                "visible" => self.visibility = Visibility::Visible,
                "hidden" => self.visibility = Visibility::Hidden,
                "collapse" => self.visibility = Visibility::Collapse,
                _ => {}
            },
            "font-family" => {
                self.font_family = value.to_string();
            }
            "font-size" => {
                let n = units::parse_length(value, self.font_size, font_size, font_size);
                if n > 0.0 {
                    self.font_size = n;
                }
            }
            "font-weight" => {
                self.font_weight = parse_font_weight(value, self.font_weight);
            }
            "font-style" => match value {
                "normal" => self.font_style = FontStyle::Normal,
                "italic" => self.font_style = FontStyle::Italic,
                "oblique" => self.font_style = FontStyle::Oblique,
                _ => {}
            },
            "text-anchor" => match value {
                "start" => self.text_anchor = TextAnchor::Start,
                "middle" => self.text_anchor = TextAnchor::Middle,
                "end" => self.text_anchor = TextAnchor::End,
                _ => {}
            },
            "text-decoration" => {
                let mut decoration = TextDecoration::default();
                for token in value.split_ascii_whitespace() {
                    match token {
                        "underline" => decoration.underline = true,
                        "overline" => decoration.overline = true,
                        "line-through" => decoration.line_through = true,
                        _ => {}
                    }
                }
                self.text_decoration = decoration;
            }
            "color" => {
                if let Some(c) = color::parse_color(value) {
                    self.color = c;
                }
            }
            "clip-path" => {
                self.clip_path = parse_func_iri(value);
            }
            "mask" => {
                self.mask = parse_func_iri(value);
            }
            "filter" => {
                self.filter = parse_func_iri(value);
            }
            "marker-start" => {
                self.marker_start = parse_func_iri(value);
            }
            "marker-mid" => {
                self.marker_mid = parse_func_iri(value);
            }
            "marker-end" => {
                self.marker_end = parse_func_iri(value);
            }
            _ => {}
        }
    }
}

/// Extracts the id from an `url(#id)` reference.
pub fn parse_func_iri(text: &str) -> Option<String> {
    let text = text.trim();
    let inner = text.strip_prefix("url(")?;
    let end = inner.find(')')?;
    let link = inner[..end].trim().trim_matches(|c| c == '\'' || c == '"');
    let id = link.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn parse_opacity(value: &str, default: f64) -> f64 {
    let n = if let Some(p) = value.strip_suffix('%') {
        units::parse_number(p, default * 100.0) / 100.0
    } else {
        units::parse_number(value, default)
    };

    n.max(0.0).min(1.0)
}

fn parse_font_weight(value: &str, default: u16) -> u16 {
    match value {
        "normal" => 400,
        "bold" => 700,
        "bolder" => 700,
        "lighter" => 300,
        _ => match value.parse::<u16>() {
            Ok(n) if (1..=1000).contains(&n) => n,
            _ => default,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_parsing() {
        let mut style = Style::default();
        style.set_property("fill", "none");
        assert_eq!(style.fill, None);

        style.set_property("fill", "#00ff00");
        assert_eq!(style.fill, Some(Paint::Color(Color::new(0, 255, 0))));

        style.set_property("fill", "url(#grad)");
        assert_eq!(style.fill, Some(Paint::Link("grad".to_string())));

        // Garbage keeps the current value.
        style.set_property("fill", "!!!");
        assert_eq!(style.fill, Some(Paint::Link("grad".to_string())));
    }

    #[test]
    fn func_iri() {
        assert_eq!(parse_func_iri("url(#a)"), Some("a".to_string()));
        assert_eq!(parse_func_iri("url('#a')"), Some("a".to_string()));
        assert_eq!(parse_func_iri("url(#a) none"), Some("a".to_string()));
        assert_eq!(parse_func_iri("#a"), None);
        assert_eq!(parse_func_iri("url(image.png)"), None);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut style = Style::default();
        style.set_property("opacity", "2");
        assert_eq!(style.opacity, 1.0);
        style.set_property("opacity", "-1");
        assert_eq!(style.opacity, 0.0);
        style.set_property("opacity", "50%");
        assert_eq!(style.opacity, 0.5);
    }

    #[test]
    fn non_inherited_reset() {
        let mut style = Style::default();
        style.set_property("opacity", "0.5");
        style.set_property("clip-path", "url(#c)");
        style.set_property("fill", "red");

        let child = style.inherited();
        assert_eq!(child.opacity, 1.0);
        assert_eq!(child.clip_path, None);
        // Paint is inherited.
        assert_eq!(child.fill, Some(Paint::Color(Color::new(255, 0, 0))));
    }

    #[test]
    fn font_size_relative_units() {
        let mut style = Style::default();
        style.set_property("font-size", "2em");
        assert_eq!(style.font_size, 32.0);
        style.set_property("font-size", "50%");
        assert_eq!(style.font_size, 16.0);
    }
}
