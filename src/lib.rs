// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgpdf` compiles an SVG scene into a PDF content stream.

The compiler walks the typed tree produced by [`svgscene`] and emits
path, text and image operators in a coordinate system flipped to the
PDF convention. Paint servers become shading and tiling-pattern
resources; opacity becomes extended graphics states. The result is a
content stream plus the resource dictionaries it references, ready to
be merged into a page by a PDF writer.

Font embedding is handled by the [`fontsub`] crate: parse a TrueType
font, subset it to the used characters and serialize it back.

```no_run
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let data = std::fs::read("drawing.svg")?;
let doc = svgscene::Document::from_data(&data)?;
let output = svgpdf::compile(&doc);
std::io::Write::write_all(&mut std::io::stdout(), &output.content)?;
# Ok(()) }
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]

pub use fontsub;
pub use svgscene;

mod clip;
mod image;
mod marker;
mod paint_server;
mod path;
mod render;
mod stream;
mod text;

/// An external object resource.
#[derive(Clone, Debug)]
pub enum XObject {
    /// A raster image with its raw encoded bytes.
    Image {
        /// The payload media type, e.g. `image/png`.
        media_type: String,
        /// The encoded image bytes.
        data: Vec<u8>,
    },
    /// A form holding a captured content stream.
    Form {
        /// The form bounding box, `x y w h`.
        bbox: (f64, f64, f64, f64),
        /// The captured stream.
        content: Vec<u8>,
    },
}

/// A tiling pattern resource.
#[derive(Clone, Debug)]
pub struct PatternResource {
    /// The pattern dictionary, without the stream framing.
    pub dict: String,
    /// The pattern stream content, painting the tile form.
    pub content: Vec<u8>,
    /// The name of the form XObject holding the tile.
    pub xobject: String,
}

/// The result of a compilation.
///
/// Resource payloads are opaque blobs keyed by generated names
/// (`Sh1`, `P1`, `GS1`, `Im1`, `FXO1`). The caller merges them into
/// the page resource dictionary under the matching sub-dictionaries.
#[derive(Clone, Debug)]
pub struct Output {
    /// The page content stream.
    pub content: Vec<u8>,

    /// Shading dictionaries.
    pub shadings: Vec<(String, String)>,

    /// Tiling patterns.
    pub patterns: Vec<(String, PatternResource)>,

    /// Extended graphics states.
    pub graphics_states: Vec<(String, String)>,

    /// Images and forms.
    pub xobjects: Vec<(String, XObject)>,

    /// Referenced base-14 font names.
    pub fonts: Vec<String>,
}

/// Compiles a parsed document into a content stream and resources.
///
/// Compilation never fails: unresolved references and unsupported
/// constructs degrade to warnings and a visually incomplete, but
/// valid, stream.
pub fn compile(doc: &svgscene::Document) -> Output {
    render::render(doc)
}
