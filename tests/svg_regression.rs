//! End-to-end SVG output checks

use text_annotator::{render_svg, LabelSpec, LayoutOptions, LinkSpec, Theme};

#[test]
fn test_plain_text_document() {
    let svg = render_svg(
        "hello",
        vec![],
        vec![],
        LayoutOptions::default(),
        Theme::default(),
    )
    .unwrap();

    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("ta-glyph").count(), 5);
}

#[test]
fn test_labeled_document_layers() {
    let svg = render_svg(
        "Alice employs Bob",
        vec![
            LabelSpec::new(0, 4, "PER").with_ex_data("alice"),
            LabelSpec::new(14, 16, "PER").with_ex_data("bob"),
        ],
        vec![LinkSpec::new("alice", "bob", "employs")],
        LayoutOptions::default(),
        Theme::default(),
    )
    .unwrap();

    // marks paint under text, labels paint over paths
    let first_mark = svg.find("ta-mark").unwrap();
    let first_glyph = svg.find("ta-glyph").unwrap();
    let first_path = svg.find("ta-path").unwrap();
    let first_label = svg.find("ta-label").unwrap();
    assert!(first_mark < first_glyph);
    assert!(first_glyph < first_path);
    assert!(first_path < first_label);

    assert_eq!(svg.matches("ta-label").count(), 2);
    assert!(svg.contains(">employs</text>"));
}

#[test]
fn test_cross_row_link_renders_three_polyline_groups() {
    let svg = render_svg(
        "ab\ncd",
        vec![
            LabelSpec::new(0, 1, "A").with_ex_data("a"),
            LabelSpec::new(3, 4, "B").with_ex_data("b"),
        ],
        vec![LinkSpec::new("a", "b", "rel")],
        LayoutOptions::default(),
        Theme::default(),
    )
    .unwrap();

    assert_eq!(svg.matches("ta-path").count(), 3);
    // exactly one arrowhead polyline beyond the three shaft polylines
    assert_eq!(svg.matches("<polyline").count(), 4);
}

#[test]
fn test_theme_colors_flow_through() {
    let theme = Theme::from_toml(
        r##"
        background-color = "#101010"

        [label]
        background-color = "#ff00ff"
        "##,
    )
    .unwrap();

    let svg = render_svg(
        "abc",
        vec![LabelSpec::new(0, 1, "X").with_style(theme.label.clone())],
        vec![],
        LayoutOptions::default(),
        theme,
    )
    .unwrap();

    assert!(svg.contains("#ff00ff"));
    assert!(svg.contains("background-color:#101010"));
}

#[test]
fn test_document_height_grows_with_annotations() {
    let bare = render_svg(
        "abcdef",
        vec![],
        vec![],
        LayoutOptions::default(),
        Theme::default(),
    )
    .unwrap();
    let labeled = render_svg(
        "abcdef",
        vec![LabelSpec::new(0, 2, "T")],
        vec![],
        LayoutOptions::default(),
        Theme::default(),
    )
    .unwrap();

    let height = |svg: &str| -> f64 {
        let marker = "height=\"";
        let start = svg.find(marker).unwrap() + marker.len();
        let end = svg[start..].find('"').unwrap() + start;
        svg[start..end].parse().unwrap()
    };
    assert!(height(&labeled) > height(&bare));
}
