use super::{resample, Point, Recognizer, RecognizerConfig, Swipe};

fn horizontal_stroke(leftward: bool) -> Vec<Point> {
    (0..=10)
        .map(|i| {
            let t = i as f64 / 10.0;
            Point::new(if leftward { 1.0 - t } else { t }, 0.5)
        })
        .collect()
}

#[test]
fn resampling_yields_the_requested_count_with_even_spacing() {
    let resampled = resample(&horizontal_stroke(false), 64);
    assert_eq!(resampled.len(), 64);

    let expected = 1.0 / 63.0;
    for pair in resampled.windows(2) {
        let gap = (pair[0].x - pair[1].x).hypot(pair[0].y - pair[1].y);
        assert!(
            (gap - expected).abs() < 1e-6,
            "uneven spacing: {gap} vs {expected}"
        );
    }
}

#[test]
fn resampling_preserves_the_endpoints() {
    let stroke = vec![
        Point::new(0.0, 0.0),
        Point::new(0.3, 0.8),
        Point::new(0.9, 0.2),
    ];
    let resampled = resample(&stroke, 32);
    assert_eq!(resampled.len(), 32);
    assert_eq!(resampled[0], stroke[0]);
    let last = resampled[31];
    assert!((last.x - 0.9).abs() < 1e-6 && (last.y - 0.2).abs() < 1e-6);
}

#[test]
fn left_swipe_matches_its_own_template_exactly() {
    let mut recognizer = Recognizer::default();
    for point in horizontal_stroke(true) {
        recognizer.push(point);
    }
    assert_eq!(recognizer.recognize(), Some(Swipe::Left));
    assert_eq!(recognizer.stroke_len(), 0, "matched stroke is cleared");
}

#[test]
fn right_swipe_is_told_apart_from_left() {
    let mut recognizer = Recognizer::default();
    for point in horizontal_stroke(false) {
        recognizer.push(point);
    }
    assert_eq!(recognizer.recognize(), Some(Swipe::Right));
}

#[test]
fn vertical_stroke_matches_neither_template() {
    let mut recognizer = Recognizer::default();
    for i in 0..=10 {
        recognizer.push(Point::new(0.0, i as f64 / 10.0));
    }
    assert_eq!(recognizer.recognize(), None);
    assert_eq!(
        recognizer.stroke_len(),
        11,
        "unmatched stroke is kept for the caller"
    );
}

#[test]
fn short_strokes_are_not_classified() {
    let mut recognizer = Recognizer::default();
    for point in horizontal_stroke(true).into_iter().take(4) {
        recognizer.push(point);
    }
    assert_eq!(recognizer.recognize(), None);
    assert_eq!(recognizer.stroke_len(), 4);
}

#[test]
fn clear_discards_a_partial_stroke() {
    let mut recognizer = Recognizer::default();
    recognizer.push(Point::new(0.1, 0.1));
    recognizer.clear();
    assert_eq!(recognizer.stroke_len(), 0);
}

#[test]
fn acceptance_threshold_is_configurable() {
    // A threshold of zero rejects even a perfect self-match.
    let mut strict = Recognizer::new(RecognizerConfig {
        resolution: 64,
        accept_threshold: 0.0,
    });
    for point in horizontal_stroke(true) {
        strict.push(point);
    }
    assert_eq!(strict.recognize(), None);
}
