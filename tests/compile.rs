// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use once_cell::sync::Lazy;
use svgpdf::{Output, XObject};
use svgscene::Document;

fn compile(svg: &str) -> Output {
    let doc = Document::from_str(svg).unwrap();
    svgpdf::compile(&doc)
}

fn content(output: &Output) -> String {
    String::from_utf8(output.content.clone()).unwrap()
}

static GRADIENT_DOC: Lazy<Output> = Lazy::new(|| {
    compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <defs>\
                <linearGradient id='g'>\
                    <stop offset='0' stop-color='#ff0000'/>\
                    <stop offset='1' stop-color='#0000ff'/>\
                </linearGradient>\
            </defs>\
            <rect x='0' y='0' width='50' height='50' fill='url(#g)'/>\
        </svg>",
    )
});

#[test]
fn view_box_header() {
    let output = compile(
        "<svg viewBox='0 0 100 50' width='200pt' height='100pt'>\
            <rect x='10' y='10' width='80' height='30' fill='#ff0000'/>\
        </svg>",
    );
    let content = content(&output);

    // The flip first, the viewBox mapping second.
    assert!(
        content.starts_with("q\n1 0 0 -1 0 100 cm\n2 0 0 2 0 0 cm\n"),
        "unexpected header: {}",
        &content[..60.min(content.len())]
    );
    assert!(content.contains("10 10 80 30 re"));
    assert!(content.contains("1 0 0 rg"));
    assert!(content.contains("\nf\n"));
    assert!(content.trim_end().ends_with('Q'));
}

#[test]
fn no_view_box_still_flips() {
    let output = compile("<svg width='80' height='40'><rect width='10' height='10'/></svg>");
    let content = content(&output);
    // 40px is 30pt.
    assert!(content.starts_with("q\n1 0 0 -1 0 30 cm\n"));
    assert!(!content.contains("cm\nq\nq"));
}

#[test]
fn path_commands() {
    let output = compile(
        "<svg viewBox='0 0 30 30' width='30' height='30'>\
            <path d='M 10 10 L 20 10 L 20 20 Z'/>\
        </svg>",
    );
    let content = content(&output);

    assert!(content.contains("10 10 m\n20 10 l\n20 20 l\nh\n"));
}

#[test]
fn gradient_fill_is_a_shading_block() {
    let content = content(&GRADIENT_DOC);

    // The rect path, then the clip-shade block.
    assert!(content.contains("0 0 50 50 re\nq\nW n\n/Sh1 sh\nQ\n"));
    // The plain fill operator must be suppressed.
    assert!(!content.contains("\nf\n"));

    let (name, dict) = &GRADIENT_DOC.shadings[0];
    assert_eq!(name, "Sh1");
    assert!(dict.contains("/ShadingType 2"));
    assert!(dict.contains("/FunctionType 2"));
    // objectBoundingBox endpoints mapped through the 50x50 bbox.
    assert!(dict.contains("/Coords [0 0 50 0]"));
    assert!(dict.contains("/Extend [true true]"));
}

#[test]
fn gradient_fill_keeps_stroke() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <defs>\
                <linearGradient id='g'>\
                    <stop offset='0' stop-color='#ff0000'/>\
                    <stop offset='1' stop-color='#0000ff'/>\
                </linearGradient>\
            </defs>\
            <rect width='50' height='50' fill='url(#g)' stroke='#000000' stroke-width='2'/>\
        </svg>",
    );
    let content = content(&output);

    // The shading block comes first, then the path again for the
    // stroke.
    let sh = content.find("/Sh1 sh").unwrap();
    let stroke = content.rfind("0 0 50 50 re\nS\n").unwrap();
    assert!(stroke > sh);
    assert!(content.contains("0 0 0 RG"));
    assert!(content.contains("2 w"));
}

#[test]
fn three_stop_gradient_uses_stitching() {
    let output = compile(
        "<svg viewBox='0 0 10 10' width='10' height='10'>\
            <linearGradient id='g'>\
                <stop offset='0' stop-color='#ff0000'/>\
                <stop offset='0.25' stop-color='#00ff00'/>\
                <stop offset='1' stop-color='#0000ff'/>\
            </linearGradient>\
            <rect width='10' height='10' fill='url(#g)'/>\
        </svg>",
    );

    let dict = &output.shadings[0].1;
    assert!(dict.contains("/FunctionType 3"));
    assert!(dict.contains("/Bounds [0.25]"));
    assert!(dict.contains("/Encode [0 1 0 1]"));
}

#[test]
fn opacity_becomes_graphics_state() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <rect width='10' height='10' fill-opacity='0.5'/>\
            <rect width='10' height='10' fill-opacity='0.5'/>\
            <rect width='10' height='10' fill-opacity='0.25'/>\
        </svg>",
    );
    let content = content(&output);

    // The same alpha pair reuses one state.
    assert_eq!(output.graphics_states.len(), 2);
    assert_eq!(output.graphics_states[0].0, "GS1");
    assert!(output.graphics_states[0].1.contains("/ca 0.5"));
    assert!(output.graphics_states[0].1.contains("/CA 1"));
    assert!(content.contains("/GS1 gs"));
    assert!(content.contains("/GS2 gs"));
}

#[test]
fn display_none_is_skipped() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <rect width='10' height='10' display='none'/>\
            <rect width='10' height='10' visibility='hidden'/>\
        </svg>",
    );
    let content = content(&output);
    assert!(!content.contains("re"));
}

#[test]
fn group_transform_nesting() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <g transform='translate(5 5)'>\
                <rect width='10' height='10'/>\
            </g>\
        </svg>",
    );
    let content = content(&output);

    let save = content.matches("q\n").count();
    let restore = content.matches("Q\n").count();
    assert_eq!(save, restore);
    assert!(content.contains("1 0 0 1 5 5 cm"));
}

#[test]
fn use_expansion() {
    let output = compile(
        "<svg viewBox='0 0 40 40' width='40' height='40'>\
            <defs>\
                <rect id='r' width='10' height='10' fill='#00ff00'/>\
            </defs>\
            <use href='#r' x='5' y='7'/>\
            <use href='#missing'/>\
        </svg>",
    );
    let content = content(&output);

    assert!(content.contains("1 0 0 1 5 7 cm"));
    assert!(content.contains("0 0 10 10 re"));
    assert!(content.contains("0 1 0 rg"));
}

#[test]
fn clip_path_expansion() {
    let output = compile(
        "<svg viewBox='0 0 40 40' width='40' height='40'>\
            <clipPath id='c'><rect x='1' y='2' width='3' height='4'/></clipPath>\
            <rect width='20' height='20' clip-path='url(#c)'/>\
        </svg>",
    );
    let content = content(&output);

    // The clip shape, the clip operator, then the element path.
    let clip = content.find("W n\n").unwrap();
    let rect = content.find("0 0 20 20 re").unwrap();
    assert!(clip < rect);
    assert!(content.contains("1 2 m"));
}

#[test]
fn text_emission_order() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <text x='10' y='20' font-size='12' fill='#ff0000' opacity='0.5'>Hi (there)</text>\
        </svg>",
    );
    let content = content(&output);

    let bt = content.find("BT\n").unwrap();
    let tf = content.find("/Helvetica 12 Tf\n").unwrap();
    let td = content.find("10 20 Td\n").unwrap();
    let rg = content.find("1 0 0 rg\n").unwrap();
    let gs = content.find("/GS1 gs\n").unwrap();
    let tj = content.find("(Hi \\(there\\)) Tj\n").unwrap();
    let et = content.find("ET\n").unwrap();

    // The documented text-object order.
    assert!(bt < tf && tf < td && td < rg && rg < gs && gs < tj && tj < et);
    assert_eq!(output.fonts, vec!["Helvetica".to_string()]);
}

#[test]
fn text_anchor_and_decoration() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <text x='50' y='20' font-size='10' text-anchor='middle' \
                  text-decoration='underline'>abcd</text>\
        </svg>",
    );
    let content = content(&output);

    // Four sans-serif chars at size 10 are 20 units; the anchor
    // shifts by half.
    assert!(content.contains("40 20 Td"));
    // The underline runs 10% below the baseline, 5% thick.
    assert!(content.contains("0.5 w"));
    assert!(content.contains("40 21 m\n60 21 l\nS"));
}

#[test]
fn positioned_tspans() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <text x='10' y='20' font-size='10'>\
                <tspan>ab</tspan>\
                <tspan dy='12'>cd</tspan>\
                <tspan x='40' y='50'>ef</tspan>\
            </text>\
        </svg>",
    );
    let content = content(&output);

    // One text object with relative moves between spans.
    assert_eq!(content.matches("BT\n").count(), 1);
    assert!(content.contains("10 20 Td\n(ab) Tj\n"));
    // dy shifts from the advanced position: x stays at 10 + 2*0.5*10.
    assert!(content.contains("10 12 Td\n(cd) Tj\n"));
    // The absolute tspan resets both axes.
    assert!(content.contains("20 18 Td\n(ef) Tj\n"));
}

#[test]
fn image_data_url() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <image x='5' y='6' width='32' height='16' \
                   href='data:image/png;base64,iVBORw0KGgo='/>\
        </svg>",
    );
    let content = content(&output);

    assert!(content.contains("32 0 0 16 5 6 cm\n/Im1 Do\n"));
    match &output.xobjects[0] {
        (name, XObject::Image { media_type, data }) => {
            assert_eq!(name, "Im1");
            assert_eq!(media_type, "image/png");
            assert!(data.starts_with(&[0x89, b'P', b'N', b'G']));
        }
        _ => panic!("expected an image"),
    }
}

#[test]
fn pattern_resources() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <pattern id='p' width='10' height='10' patternUnits='userSpaceOnUse'>\
                <rect width='5' height='5' fill='#0000ff'/>\
            </pattern>\
            <rect width='100' height='100' fill='url(#p)'/>\
        </svg>",
    );
    let content = content(&output);

    assert!(content.contains("/Pattern cs\n/P1 scn\n"));
    assert!(content.contains("0 0 100 100 re\nf\n"));

    let (name, pattern) = &output.patterns[0];
    assert_eq!(name, "P1");
    assert!(pattern.dict.contains("/PatternType 1"));
    assert!(pattern.dict.contains("/XStep 10"));
    assert_eq!(pattern.xobject, "FXO1");
    assert_eq!(pattern.content, b"/FXO1 Do\n");

    // The tile content landed in the form, not in the page stream.
    match &output.xobjects[0] {
        (name, XObject::Form { content: form, .. }) => {
            assert_eq!(name, "FXO1");
            let form = String::from_utf8(form.clone()).unwrap();
            assert!(form.contains("0 0 5 5 re"));
            assert!(form.contains("0 0 1 rg"));
        }
        _ => panic!("expected a form"),
    }
    assert!(!content.contains("0 0 5 5 re"));
}

#[test]
fn marker_placement() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <marker id='m' refX='1' refY='1' markerWidth='2' markerHeight='2' orient='auto'>\
                <rect width='2' height='2' fill='#ff0000'/>\
            </marker>\
            <path d='M 10 10 L 20 10' fill='none' stroke='#000000' \
                  marker-start='url(#m)' marker-end='url(#m)'/>\
        </svg>",
    );
    let content = content(&output);

    // Two placements, each translated to its vertex and shifted by
    // the reference point. markerUnits defaults to strokeWidth with
    // width 1, so the scale is the identity.
    assert!(content.contains("1 0 0 1 9 9 cm"));
    assert!(content.contains("1 0 0 1 19 9 cm"));
    assert_eq!(content.matches("0 0 2 2 re").count(), 2);
}

#[test]
fn radial_gradient_dict() {
    let output = compile(
        "<svg viewBox='0 0 10 10' width='10' height='10'>\
            <radialGradient id='g'>\
                <stop offset='0' stop-color='#ffffff'/>\
                <stop offset='1' stop-color='#000000'/>\
            </radialGradient>\
            <rect width='10' height='10' fill='url(#g)'/>\
        </svg>",
    );

    let dict = &output.shadings[0].1;
    assert!(dict.contains("/ShadingType 3"));
    // Center and focal default to the box middle; the radius scales
    // along the box diagonal.
    assert!(dict.contains("/Coords [5 5 0 5 5 5]"));
}

#[test]
fn user_space_gradient_is_not_mapped() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <linearGradient id='g' gradientUnits='userSpaceOnUse' \
                            x1='10' y1='0' x2='90' y2='0'>\
                <stop offset='0' stop-color='#ff0000'/>\
                <stop offset='1' stop-color='#0000ff'/>\
            </linearGradient>\
            <rect width='50' height='50' fill='url(#g)'/>\
        </svg>",
    );

    assert!(output.shadings[0].1.contains("/Coords [10 0 90 0]"));
}

#[test]
fn dash_array_emission() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <line x1='0' y1='0' x2='20' y2='0' stroke='#000000' \
                  stroke-dasharray='4 2' stroke-dashoffset='1'/>\
        </svg>",
    );
    let content = content(&output);

    assert!(content.contains("[4 2] 1 d"));
    assert!(content.contains("0 0 m\n20 0 l\nS"));
}

#[test]
fn line_ignores_fill() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <line x1='0' y1='0' x2='20' y2='0' fill='#ff0000' stroke='#000000'/>\
        </svg>",
    );
    let content = content(&output);

    assert!(!content.contains("rg"));
    assert!(content.trim_end().ends_with("Q"));
}

#[test]
fn text_length_forces_horizontal_scale() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <text x='10' y='20' font-size='10' textLength='40'>ab</text>\
        </svg>",
    );
    let content = content(&output);

    // The estimated width is 10 units; stretching to 40 is 400%.
    assert!(content.contains("400 Tz"));
    assert!(content.contains("10 20 Td"));
}

#[test]
fn recursive_use_is_bounded() {
    let output = compile(
        "<svg viewBox='0 0 20 20' width='20' height='20'>\
            <g id='a'>\
                <rect width='5' height='5'/>\
                <use href='#a'/>\
            </g>\
        </svg>",
    );
    let content = content(&output);

    // The traversal gives up at the depth limit but stays balanced.
    assert_eq!(content.matches("q\n").count(), content.matches("Q\n").count());
}

#[test]
fn drop_shadow_filter() {
    let output = compile(
        "<svg viewBox='0 0 100 100' width='100' height='100'>\
            <filter id='f'><feDropShadow dx='3' dy='4' flood-opacity='0.5'/></filter>\
            <rect width='10' height='10' fill='#ff0000' filter='url(#f)'/>\
        </svg>",
    );
    let content = content(&output);

    // The shadow copy paints first, offset and gray-to-black.
    let shadow = content.find("1 0 0 1 3 4 cm").unwrap();
    let body = content.find("1 0 0 rg").unwrap();
    assert!(shadow < body);
    assert!(content.matches("0 0 10 10 re").count() >= 2);
}
