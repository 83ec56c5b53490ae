//! Unit tests for the placeholder renderer

use concrete_vision::generator::placeholder::{wrap_text, PlaceholderRenderer};
use image::Rgb;

#[test]
fn test_wrap_quick_brown_fox() {
    let prompt = "the quick brown fox jumps over the lazy dog";
    let lines = wrap_text(prompt, 40);

    for line in &lines {
        assert!(line.chars().count() <= 40);
    }

    // Word order and all words preserved, single-space separated
    let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
    let original: Vec<&str> = prompt.split(' ').collect();
    assert_eq!(rejoined, original);
    for line in &lines {
        assert!(!line.contains("  "));
    }
}

#[test]
fn test_wrap_exact_boundary() {
    // 40 characters joined exactly fills one line
    let prompt = "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddd";
    assert_eq!(prompt.len(), 39);
    let lines = wrap_text(prompt, 40);
    assert_eq!(lines, vec![prompt.to_string()]);
}

#[test]
fn test_wrap_overflow_starts_new_line() {
    let prompt = "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddddddd eee";
    let lines = wrap_text(prompt, 40);
    assert_eq!(
        lines,
        vec![
            "aaaaaaaaaa bbbbbbbbbb cccccccccc".to_string(),
            "dddddddddd eee".to_string(),
        ]
    );
}

#[test]
fn test_wrap_collapses_arbitrary_whitespace() {
    let lines = wrap_text("a\t b\n  c", 40);
    assert_eq!(lines, vec!["a b c".to_string()]);
}

#[test]
fn test_wrap_degenerate_input_truncates_raw_text() {
    assert_eq!(wrap_text("", 40), vec![String::new()]);
}

#[test]
fn test_render_is_pixel_identical_across_calls() {
    let renderer = PlaceholderRenderer::default();
    for prompt in ["", "short", "a much longer prompt that wraps over several lines"] {
        let first = renderer.render(prompt);
        let second = renderer.render(prompt);
        assert_eq!(first.as_raw(), second.as_raw(), "prompt {:?}", prompt);
    }
}

#[test]
fn test_render_different_prompts_differ() {
    let renderer = PlaceholderRenderer::default();
    let a = renderer.render("a red barn");
    let b = renderer.render("a blue boat");
    assert_ne!(a.as_raw(), b.as_raw());
}

#[test]
fn test_render_custom_size() {
    let renderer = PlaceholderRenderer::new(256, 128);
    let img = renderer.render("sized");
    assert_eq!(img.dimensions(), (256, 128));
    assert_eq!(*img.get_pixel(255, 127), Rgb([32, 32, 32]));
}

#[test]
fn test_render_label_band_has_text_pixels() {
    let renderer = PlaceholderRenderer::default();
    let img = renderer.render("anything");
    // The "Offline Mode" label is drawn at (20, 20) at scale 2
    let drawn = (20..36)
        .flat_map(|y| (20..220).map(move |x| (x, y)))
        .any(|(x, y)| *img.get_pixel(x, y) != Rgb([32, 32, 32]));
    assert!(drawn);
}
