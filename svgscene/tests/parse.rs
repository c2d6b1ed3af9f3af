// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene::{
    Color, Document, ElementTag, FuzzyEq, Gradient, MarkerOrient, Paint, SpreadMethod, Units,
};

#[test]
fn minimal_document() {
    let doc = Document::from_str(
        "<svg viewBox='0 0 100 50' width='200pt' height='100pt'>\
            <rect x='10' y='10' width='80' height='30' fill='#ff0000'/>\
        </svg>",
    )
    .unwrap();

    // 200pt = 266.67px, and 1px = 0.75pt.
    assert!(doc.size.width().fuzzy_eq(&200.0));
    assert!(doc.size.height().fuzzy_eq(&100.0));

    let vb = doc.view_box.unwrap();
    assert_eq!(vb.width(), 100.0);
    assert_eq!(vb.height(), 50.0);

    let rect = doc.root.first_child().unwrap();
    let rect = rect.borrow();
    assert_eq!(rect.tag, ElementTag::Rect);
    assert_eq!(rect.style.fill, Some(Paint::Color(Color::new(255, 0, 0))));
}

#[test]
fn root_must_be_svg() {
    assert!(matches!(
        Document::from_str("<html></html>"),
        Err(svgscene::Error::MalformedDocument)
    ));
}

#[test]
fn namespace_tolerant_root() {
    let doc = Document::from_str("<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'/>");
    assert!(doc.is_ok());
}

#[test]
fn size_from_view_box() {
    let doc = Document::from_str("<svg viewBox='0 0 40 20'/>").unwrap();
    assert!(doc.size.width().fuzzy_eq(&30.0));
    assert!(doc.size.height().fuzzy_eq(&15.0));
}

#[test]
fn style_cascade_order() {
    // Inline style beats the stylesheet, which beats presentation attributes.
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <style>rect { fill: #00ff00 } #a { fill: #0000ff }</style>\
            <rect id='a' fill='#ff0000' width='5' height='5'/>\
            <rect fill='#ff0000' style='fill: #ffffff' width='5' height='5'/>\
        </svg>",
    )
    .unwrap();

    let first = doc.element_by_id("a").unwrap().borrow().style.clone();
    assert_eq!(first.fill, Some(Paint::Color(Color::new(0, 0, 255))));

    let second = doc.root.last_child().unwrap().borrow().style.clone();
    assert_eq!(second.fill, Some(Paint::Color(Color::new(255, 255, 255))));
}

#[test]
fn style_inheritance() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <g fill='#ff0000' opacity='0.5' font-size='20'>\
                <rect width='5' height='5'/>\
            </g>\
        </svg>",
    )
    .unwrap();

    let g = doc.root.first_child().unwrap();
    let rect = g.first_child().unwrap();
    let style = rect.borrow().style.clone();

    assert_eq!(style.fill, Some(Paint::Color(Color::new(255, 0, 0))));
    assert_eq!(style.font_size, 20.0);
    // Group opacity must not leak into children.
    assert_eq!(style.opacity, 1.0);
}

#[test]
fn gradient_with_stops() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <defs>\
                <linearGradient id='g' x1='0' y1='0' x2='1' y2='0' spreadMethod='reflect'>\
                    <stop offset='0' stop-color='#ff0000'/>\
                    <stop offset='100%' stop-color='#0000ff' stop-opacity='0.5'/>\
                </linearGradient>\
            </defs>\
        </svg>",
    )
    .unwrap();

    let gradient = doc.gradients.get("g").unwrap();
    match gradient {
        Gradient::Linear(ref lg) => {
            assert_eq!(lg.x2, 1.0);
            assert_eq!(lg.base.spread_method, SpreadMethod::Reflect);
            assert_eq!(lg.base.units, Units::ObjectBoundingBox);
            assert_eq!(lg.base.stops.len(), 2);
            assert_eq!(lg.base.stops[0].color, Color::new(255, 0, 0));
            assert_eq!(lg.base.stops[1].offset, 1.0);
            assert_eq!(lg.base.stops[1].opacity, 0.5);
        }
        _ => panic!("expected a linear gradient"),
    }
}

#[test]
fn gradient_href_inheritance() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <linearGradient id='base'>\
                <stop offset='0' stop-color='#ff0000'/>\
                <stop offset='1' stop-color='#0000ff'/>\
            </linearGradient>\
            <linearGradient id='g' x1='0.5' href='#base'/>\
        </svg>",
    )
    .unwrap();

    let gradient = doc.gradients.get("g").unwrap();
    match gradient {
        Gradient::Linear(ref lg) => {
            assert_eq!(lg.x1, 0.5);
            // Stops come from the referenced gradient.
            assert_eq!(lg.base.stops.len(), 2);
        }
        _ => panic!("expected a linear gradient"),
    }
}

#[test]
fn gradient_without_stops_is_dropped() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <linearGradient id='g'/>\
        </svg>",
    )
    .unwrap();

    assert!(doc.gradients.get("g").is_none());
    // But the element itself is still registered.
    assert!(doc.element_by_id("g").is_some());
}

#[test]
fn marker_collection() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <marker id='m' refX='1' refY='2' markerWidth='4' markerHeight='5' orient='auto'>\
                <path d='M 0 0 L 4 2 L 0 4'/>\
            </marker>\
        </svg>",
    )
    .unwrap();

    let marker = doc.markers.get("m").unwrap();
    assert_eq!(marker.ref_x, 1.0);
    assert_eq!(marker.ref_y, 2.0);
    assert_eq!(marker.width, 4.0);
    assert_eq!(marker.orient, MarkerOrient::Auto);
}

#[test]
fn text_content_is_captured() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <text x='5' y='5'>Hello</text>\
        </svg>",
    )
    .unwrap();

    let text = doc.root.first_child().unwrap();
    let text = text.borrow();
    assert_eq!(text.tag, ElementTag::Text);
    assert_eq!(text.text.as_deref(), Some("Hello"));
}

#[test]
fn unknown_elements_are_skipped() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <desc>ignored</desc>\
            <rect width='5' height='5'/>\
        </svg>",
    )
    .unwrap();

    assert_eq!(doc.root.children().count(), 1);
}

#[test]
fn duplicated_ids() {
    let doc = Document::from_str(
        "<svg width='10' height='10'>\
            <rect id='a' width='5' height='5'/>\
            <circle id='a' r='5'/>\
        </svg>",
    )
    .unwrap();

    // The first element wins.
    assert_eq!(doc.element_by_id("a").unwrap().borrow().tag, ElementTag::Rect);
}

#[test]
fn gzip_round_trip() {
    use std::io::Write;

    let svg = "<svg width='10' height='10'/>";
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(svg.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let doc = Document::from_data(&data).unwrap();
    assert!(doc.size.width().fuzzy_eq(&7.5));
}
