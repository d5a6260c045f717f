use chartkit::labels::text::{FontSpec, HeuristicMeasurer, TextMeasurer};
use chartkit::labels::{FONT_MIN, HorzAlign, LabelOptions, MAX_LINES, VertAlign, layout_label};

fn measurer() -> HeuristicMeasurer {
    // 6px per character at size 10.
    HeuristicMeasurer::default()
}

fn texts(layout: &chartkit::LabelLayout) -> Vec<&str> {
    layout.lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn short_text_in_large_box_uses_max_size() {
    let layout = layout_label(&LabelOptions::new("Hi", 400.0, 200.0), &measurer());
    assert_eq!(layout.size, 30.0);
    assert_eq!(layout.line_height, 36.0);
    assert_eq!(layout.font_height, 30.0);
    assert_eq!(texts(&layout), ["Hi"]);
    assert_eq!(layout.lines[0].width, 36.0);
}

#[test]
fn tiny_box_gets_single_ellipsis_at_minimum_size() {
    let options = LabelOptions::new("Supercalifragilistic expialidocious", 20.0, 20.0);
    let layout = layout_label(&options, &measurer());
    assert_eq!(layout.size, FONT_MIN);
    assert_eq!(texts(&layout), ["…"]);
}

#[test]
fn long_text_never_exceeds_three_lines() {
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    for (w, h) in [(60.0, 40.0), (200.0, 100.0), (500.0, 30.0), (30.0, 500.0)] {
        let layout = layout_label(&LabelOptions::new(text.clone(), w, h), &measurer());
        assert!(layout.lines.len() <= MAX_LINES, "{w}x{h}");
        assert!(layout.size >= FONT_MIN);
        let last = layout.lines.last().expect("something is drawn");
        assert!(last.text.ends_with('…'), "{w}x{h}: {:?}", last.text);
        for line in &layout.lines {
            assert!(line.width <= w, "{w}x{h}: {line:?}");
        }
    }
}

#[test]
fn shrinks_until_text_fits() {
    // Needs three lines at 20px and 19px, which a 50px box cannot hold;
    // at 18px it wraps into two.
    let options = LabelOptions::new("aaaa bbbb cccc", 100.0, 50.0).with_max_font_size(20.0);
    let layout = layout_label(&options, &measurer());
    assert_eq!(layout.size, 18.0);
    assert!(layout.lines.iter().all(|l| !l.text.contains('…')));
    let joined = texts(&layout).join(" ");
    assert_eq!(joined, "aaaa bbbb cccc");
}

#[test]
fn centre_alignment_centres_each_line() {
    let options =
        LabelOptions::new("Hi", 400.0, 200.0).with_align(VertAlign::Top, HorzAlign::Center);
    let layout = layout_label(&options, &measurer());
    let line = &layout.lines[0];
    assert_eq!(line.x, (400.0 - line.width) / 2.0);

    let options =
        LabelOptions::new("Hi", 400.0, 200.0).with_align(VertAlign::Top, HorzAlign::Right);
    let line = &layout_label(&options, &measurer()).lines[0];
    assert_eq!(line.x, 400.0 - line.width);
}

fn two_lines(vert: VertAlign) -> Vec<f64> {
    // At a fixed 10px, "aaa bbb" breaks into two lines in a 30px box.
    let options = LabelOptions::new("aaa bbb", 30.0, 100.0)
        .with_fixed_font_size(10.0)
        .with_align(vert, HorzAlign::Left);
    let layout = layout_label(&options, &measurer());
    assert_eq!(texts(&layout), ["aaa", "bbb"]);
    layout.lines.iter().map(|l| l.y).collect()
}

#[test]
fn vertical_alignment_offsets() {
    // Line height 12, font height 10.
    assert_eq!(two_lines(VertAlign::Top), [10.0, 22.0]);
    // Block height 2 * 12 + 10 = 34: base (100 - 34 + 10) / 2 = 38.
    assert_eq!(two_lines(VertAlign::Middle), [48.0, 60.0]);
}

#[test]
fn bottom_alignment_does_not_add_font_height() {
    // Stacks upward from the box edge; top and middle add the font height,
    // bottom does not.
    assert_eq!(two_lines(VertAlign::Bottom), [100.0, 88.0]);
}

#[test]
fn fixed_size_ellipsizes_instead_of_shrinking() {
    let options = LabelOptions::new("aaa bbb ccc ddd", 30.0, 100.0).with_fixed_font_size(10.0);
    let layout = layout_label(&options, &measurer());
    assert_eq!(layout.size, 10.0);
    assert_eq!(layout.line_height, 12.0);
    assert_eq!(texts(&layout), ["aaa", "bbb", "ccc…"]);
}

#[test]
fn fixed_size_is_clamped() {
    let options = LabelOptions::new("a", 300.0, 300.0).with_fixed_font_size(80.0);
    assert_eq!(layout_label(&options, &measurer()).size, 30.0);
    let options = LabelOptions::new("a", 300.0, 300.0).with_fixed_font_size(2.0);
    assert_eq!(layout_label(&options, &measurer()).size, FONT_MIN);
}

#[test]
fn degenerate_boxes_draw_nothing() {
    for (w, h) in [(8.0, 100.0), (0.0, 0.0), (100.0, 5.0), (-10.0, 50.0)] {
        let layout = layout_label(&LabelOptions::new("Revenue", w, h), &measurer());
        assert!(layout.lines.is_empty(), "{w}x{h}");
    }
}

#[test]
fn empty_text_draws_nothing() {
    let layout = layout_label(&LabelOptions::new("", 100.0, 100.0), &measurer());
    assert!(layout.lines.is_empty());
}

#[test]
fn identical_input_gives_identical_output() {
    let options = LabelOptions::new("Sessions per organisation, last 30 days", 140.0, 60.0)
        .with_align(VertAlign::Middle, HorzAlign::Center);
    let m = measurer();
    let first = layout_label(&options, &m);
    let second = layout_label(&options, &m);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn layout_serialises_camel_case() {
    let layout = layout_label(&LabelOptions::new("Hi", 400.0, 200.0), &measurer());
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["lineHeight"], 36.0);
    assert_eq!(json["fontHeight"], 30.0);
    assert_eq!(json["lines"][0]["text"], "Hi");
}

/// Every character is 10px regardless of size, so only the line height
/// decides how many lines fit.
struct Monospace10;

impl TextMeasurer for Monospace10 {
    fn measure_width(&self, text: &str, _font: &FontSpec) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

#[test]
fn custom_measurer_is_used() {
    let layout = layout_label(&LabelOptions::new("abc", 100.0, 100.0), &Monospace10);
    assert_eq!(layout.lines[0].width, 30.0);
}

#[test]
fn two_words_keep_the_largest_single_line_size() {
    // At 24px the line is 201.6px wide; at 23px it fits on one line.
    let layout = layout_label(&LabelOptions::new("Revenue growth", 200.0, 40.0), &measurer());
    assert_eq!(layout.size, 23.0);
    assert_eq!(texts(&layout), ["Revenue growth"]);
}

#[test]
fn huge_max_font_size_is_capped_by_the_box() {
    for max in [1e20, f64::INFINITY] {
        let options = LabelOptions::new("a", 100.0, 100.0).with_max_font_size(max);
        let layout = layout_label(&options, &measurer());
        assert_eq!(layout.size, 80.0, "{max}");
        assert_eq!(texts(&layout), ["a"]);
    }
}
