// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::css::{self, Stylesheet};
use crate::error::Error;
use crate::geom::{Rect, Size};
use crate::paint_server::{ClipPath, Filter, Gradient, Marker, Mask, Pattern};
use crate::style::Style;
use crate::transform::Transform;

/// An element tag name.
///
/// A closed set; elements with other names are dropped during parsing.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ElementTag {
    Svg,
    G,
    Defs,
    Symbol,
    Use,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
    Tspan,
    Image,
    LinearGradient,
    RadialGradient,
    Stop,
    Pattern,
    ClipPath,
    Mask,
    Marker,
    Filter,
    FeGaussianBlur,
    FeOffset,
    FeDropShadow,
    Style,
}

impl ElementTag {
    /// Maps an XML local name onto a tag.
    pub fn from_str(name: &str) -> Option<Self> {
        let tag = match name {
            "svg" => ElementTag::Svg,
            "g" => ElementTag::G,
            "defs" => ElementTag::Defs,
            "symbol" => ElementTag::Symbol,
            "use" => ElementTag::Use,
            "rect" => ElementTag::Rect,
            "circle" => ElementTag::Circle,
            "ellipse" => ElementTag::Ellipse,
            "line" => ElementTag::Line,
            "polyline" => ElementTag::Polyline,
            "polygon" => ElementTag::Polygon,
            "path" => ElementTag::Path,
            "text" => ElementTag::Text,
            "tspan" => ElementTag::Tspan,
            "image" => ElementTag::Image,
            "linearGradient" => ElementTag::LinearGradient,
            "radialGradient" => ElementTag::RadialGradient,
            "stop" => ElementTag::Stop,
            "pattern" => ElementTag::Pattern,
            "clipPath" => ElementTag::ClipPath,
            "mask" => ElementTag::Mask,
            "marker" => ElementTag::Marker,
            "filter" => ElementTag::Filter,
            "feGaussianBlur" => ElementTag::FeGaussianBlur,
            "feOffset" => ElementTag::FeOffset,
            "feDropShadow" => ElementTag::FeDropShadow,
            "style" => ElementTag::Style,
            _ => return None,
        };

        Some(tag)
    }

    /// Returns the SVG tag name.
    pub fn to_str(self) -> &'static str {
        match self {
            ElementTag::Svg => "svg",
            ElementTag::G => "g",
            ElementTag::Defs => "defs",
            ElementTag::Symbol => "symbol",
            ElementTag::Use => "use",
            ElementTag::Rect => "rect",
            ElementTag::Circle => "circle",
            ElementTag::Ellipse => "ellipse",
            ElementTag::Line => "line",
            ElementTag::Polyline => "polyline",
            ElementTag::Polygon => "polygon",
            ElementTag::Path => "path",
            ElementTag::Text => "text",
            ElementTag::Tspan => "tspan",
            ElementTag::Image => "image",
            ElementTag::LinearGradient => "linearGradient",
            ElementTag::RadialGradient => "radialGradient",
            ElementTag::Stop => "stop",
            ElementTag::Pattern => "pattern",
            ElementTag::ClipPath => "clipPath",
            ElementTag::Mask => "mask",
            ElementTag::Marker => "marker",
            ElementTag::Filter => "filter",
            ElementTag::FeGaussianBlur => "feGaussianBlur",
            ElementTag::FeOffset => "feOffset",
            ElementTag::FeDropShadow => "feDropShadow",
            ElementTag::Style => "style",
        }
    }

    /// Returns `true` for elements that define referenced content
    /// and are not rendered directly.
    pub fn is_never_rendered(self) -> bool {
        matches!(
            self,
            ElementTag::Defs
                | ElementTag::Symbol
                | ElementTag::LinearGradient
                | ElementTag::RadialGradient
                | ElementTag::Stop
                | ElementTag::Pattern
                | ElementTag::ClipPath
                | ElementTag::Mask
                | ElementTag::Marker
                | ElementTag::Filter
                | ElementTag::FeGaussianBlur
                | ElementTag::FeOffset
                | ElementTag::FeDropShadow
                | ElementTag::Style
        )
    }

    /// Returns `true` for basic shapes.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ElementTag::Rect
                | ElementTag::Circle
                | ElementTag::Ellipse
                | ElementTag::Line
                | ElementTag::Polyline
                | ElementTag::Polygon
                | ElementTag::Path
        )
    }
}

impl std::fmt::Display for ElementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A scene element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Element tag.
    pub tag: ElementTag,

    /// Element id. Empty when absent.
    pub id: String,

    /// Raw attributes, except `id`.
    pub attributes: HashMap<String, String>,

    /// Text content of `text`/`tspan` elements.
    pub text: Option<String>,

    /// The resolved style.
    pub style: Style,

    /// The parsed `transform` attribute.
    pub transform: Option<Transform>,
}

impl Element {
    /// Creates a bare element with a default style.
    pub fn new(tag: ElementTag) -> Self {
        Element {
            tag,
            id: String::new(),
            attributes: HashMap::new(),
            text: None,
            style: Style::default(),
            transform: None,
        }
    }

    /// Returns a raw attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// Returns an attribute, also checking the `xlink:` namespaced name.
    #[inline]
    pub fn href(&self) -> Option<&str> {
        self.attribute("href").or_else(|| self.attribute("xlink:href"))
    }

    /// Computes the cascaded style of this element against a parent style.
    ///
    /// Presentation attributes are applied first, then matching
    /// stylesheet rules by ascending specificity, then the inline
    /// `style` attribute.
    pub fn cascaded_style(&self, parent: &Style, sheet: Option<&Stylesheet>) -> Style {
        let mut style = parent.inherited();

        // `font-size` first: other length properties are relative to it.
        if let Some(value) = self.attribute("font-size") {
            style.set_property("font-size", value);
        }

        for name in PRESENTATION_ATTRIBUTES {
            if let Some(value) = self.attributes.get(*name) {
                style.set_property(name, value);
            }
        }

        if let Some(sheet) = sheet {
            let classes = self.attribute("class").unwrap_or("");
            for decl in sheet.matching(self.tag.to_str(), &self.id, classes) {
                style.set_property(&decl.property, &decl.value);
            }
        }

        if let Some(inline) = self.attribute("style") {
            for decl in css::parse_declarations(inline) {
                style.set_property(&decl.property, &decl.value);
            }
        }

        style
    }
}

/// Presentation attributes recognized by the cascade.
const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-opacity",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-dasharray",
    "stroke-dashoffset",
    "opacity",
    "display",
    "visibility",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "text-anchor",
    "text-decoration",
    "color",
    "clip-path",
    "mask",
    "filter",
    "marker-start",
    "marker-mid",
    "marker-end",
];

/// Alias for `rctree::Node<Element>`.
///
/// The tree owns children; parent links are weak.
pub type Node = rctree::Node<Element>;

/// A parsed scene document.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct Document {
    /// The root `svg` element.
    pub root: Node,

    /// Effective document size in points.
    pub size: Size,

    /// The `viewBox` rect, when present.
    pub view_box: Option<Rect>,

    /// Elements with an id.
    pub definitions: HashMap<String, Node>,

    /// Parsed gradient elements.
    pub gradients: HashMap<String, Gradient>,

    /// Parsed pattern elements.
    pub patterns: HashMap<String, Pattern>,

    /// Parsed clip path elements.
    pub clip_paths: HashMap<String, ClipPath>,

    /// Parsed mask elements.
    pub masks: HashMap<String, Mask>,

    /// Parsed marker elements.
    pub markers: HashMap<String, Marker>,

    /// Parsed filter elements.
    pub filters: HashMap<String, Filter>,
}

impl Document {
    /// Parses a document from raw data.
    ///
    /// Can contain an SVG string or gzip compressed data.
    pub fn from_data(data: &[u8]) -> Result<Self, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text)
        }
    }

    /// Parses a document from an SVG string.
    pub fn from_str(text: &str) -> Result<Self, Error> {
        let mut xml_opt = roxmltree::ParsingOptions::default();
        xml_opt.allow_dtd = true;

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)
            .map_err(Error::ParsingFailed)?;

        crate::parse::convert_document(&xml)
    }

    /// Returns an element by id.
    ///
    /// An empty id always resolves to `None`.
    pub fn element_by_id(&self, id: &str) -> Option<&Node> {
        if id.is_empty() {
            return None;
        }

        self.definitions.get(id)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}
