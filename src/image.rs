// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{units, Element, Transform};

use crate::paint_server::Resources;
use crate::stream::ContentStream;

/// Renders an `image` element with an embedded `data:` payload.
///
/// External references are skipped: the output is a self-contained
/// content stream, not a file loader.
pub(crate) fn draw(element: &Element, cs: &mut ContentStream, res: &mut Resources) {
    let href = match element.href() {
        Some(href) => href,
        None => return,
    };

    let (media_type, data) = match decode_data_url(href) {
        Some(v) => v,
        None => {
            log::warn!("Image href is not a decodable 'data:' URL, skipping.");
            return;
        }
    };

    let font_size = element.style.font_size;
    let length = |name: &str| -> f64 {
        match element.attribute(name) {
            Some(v) => units::parse_length(v, 0.0, font_size, 0.0),
            None => 0.0,
        }
    };

    let x = length("x");
    let y = length("y");
    let w = length("width");
    let h = length("height");
    if w <= 0.0 || h <= 0.0 {
        log::warn!("Image has no usable size, skipping.");
        return;
    }

    let name = res.add_image(media_type, data);

    // The image operator paints the unit square; the matrix stretches
    // it over the target rect.
    cs.save();
    cs.concat(&Transform::new(w, 0.0, 0.0, h, x, y));
    cs.xobject(&name);
    cs.restore();
}

fn decode_data_url(href: &str) -> Option<(String, Vec<u8>)> {
    if !href.trim_start().starts_with("data:") {
        return None;
    }

    if let Ok(url) = data_url::DataUrl::process(href) {
        if let Ok((data, _)) = url.decode_to_vec() {
            let media_type = format!(
                "{}/{}",
                url.mime_type().type_.as_str(),
                url.mime_type().subtype.as_str()
            );
            return Some((media_type, data));
        }
    }

    // Some generators emit spaces inside the base64 payload, which a
    // strict parser rejects. Decode those by hand.
    let rest = href.trim_start().strip_prefix("data:")?;
    let comma = rest.find(',')?;
    let header = &rest[..comma];
    let media_type = header.strip_suffix(";base64")?.to_string();

    let mut payload = rest[comma + 1..].to_string();
    payload.retain(|c| c != ' ' && c != '\n' && c != '\r' && c != '\t');
    let data = base64::decode(&payload).ok()?;

    Some((media_type, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_decoding() {
        let (media_type, data) = decode_data_url("data:image/png;base64,AQID").unwrap();
        assert_eq!(media_type, "image/png");
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn spaces_in_payload() {
        let (_, data) = decode_data_url("data:image/png;base64,AQ ID").unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn external_refs_are_rejected() {
        assert!(decode_data_url("image.png").is_none());
        assert!(decode_data_url("https://example.com/a.png").is_none());
    }
}
