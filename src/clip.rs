// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{Document, Rect, Transform, Units};

use crate::path;
use crate::stream::ContentStream;

/// Expands a clip path reference into construction operators
/// followed by a clip operator.
///
/// An unresolved reference renders without clipping; an empty clip
/// path clips everything away.
pub(crate) fn apply(id: &str, bbox: Option<Rect>, doc: &Document, cs: &mut ContentStream) {
    let clip_path = match doc.clip_paths.get(id) {
        Some(cp) => cp,
        None => {
            log::warn!("Clip path '{}' was not found.", id);
            return;
        }
    };

    let mut base_ts = Transform::default();
    if clip_path.units == Units::ObjectBoundingBox {
        let bbox = match bbox {
            Some(b) if b.size().is_some() => b,
            _ => {
                log::warn!("Clip path '{}' needs a bounding box.", id);
                return;
            }
        };
        base_ts.append(&Transform::new(
            bbox.width(),
            0.0,
            0.0,
            bbox.height(),
            bbox.x(),
            bbox.y(),
        ));
    }
    base_ts.append(&clip_path.transform);

    let mut any = false;
    let mut even_odd = false;
    for child in clip_path.node.children() {
        let element = child.borrow();
        if !element.tag.is_shape() {
            continue;
        }

        let shape = match path::convert_shape(&element) {
            Some(shape) => shape,
            None => continue,
        };

        let mut ts = base_ts;
        if let Some(child_ts) = element.transform {
            ts.append(&child_ts);
        }

        let mut data = shape.to_path();
        data.transform(ts);
        path::emit_path(&data, cs);

        even_odd |= element.attribute("clip-rule") == Some("evenodd");
        any = true;
    }

    if !any {
        // An empty clip path clips the element away entirely.
        cs.rect(0.0, 0.0, 0.0, 0.0);
        even_odd = false;
    }

    cs.clip(even_odd);
}

/// Approximates a mask by clipping to its region rectangle.
///
/// A proper luminance mask needs a transparency group the content
/// stream cannot carry on its own, so only the region is honored.
pub(crate) fn apply_mask(id: &str, bbox: Option<Rect>, doc: &Document, cs: &mut ContentStream) {
    let mask = match doc.masks.get(id) {
        Some(mask) => mask,
        None => {
            log::warn!("Mask '{}' was not found.", id);
            return;
        }
    };

    let region = if mask.units == Units::ObjectBoundingBox {
        let bbox = match bbox {
            Some(b) if b.size().is_some() => b,
            _ => {
                log::warn!("Mask '{}' needs a bounding box.", id);
                return;
            }
        };
        Rect::new(
            bbox.x() + mask.region.x() * bbox.width(),
            bbox.y() + mask.region.y() * bbox.height(),
            mask.region.width() * bbox.width(),
            mask.region.height() * bbox.height(),
        )
    } else {
        Some(mask.region)
    };

    if let Some(region) = region {
        log::warn!("Mask '{}' is approximated by its region.", id);
        cs.rect(region.x(), region.y(), region.width(), region.height());
        cs.clip(false);
    }
}
