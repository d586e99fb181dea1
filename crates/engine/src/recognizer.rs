use tracing::debug;

/// A stroke must have at least this many raw points before classification
/// is attempted.
const MIN_STROKE_POINTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Fixed point count every stroke and template is resampled to.
    pub resolution: usize,
    /// Mean pointwise distance below which the best template is accepted.
    pub accept_threshold: f64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            accept_threshold: 0.5,
        }
    }
}

/// Template-matching trajectory classifier over a captured stroke.
///
/// Both reference templates are straight horizontal swipes, resampled once
/// at construction; classification is the mean pointwise Euclidean distance
/// against each. Deliberately minimal: no rotation or scale invariance.
pub struct Recognizer {
    config: RecognizerConfig,
    templates: Vec<(Swipe, Vec<Point>)>,
    stroke: Vec<Point>,
}

impl Recognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        let left: Vec<Point> = (0..=10)
            .map(|i| Point::new(1.0 - i as f64 / 10.0, 0.5))
            .collect();
        let right: Vec<Point> = (0..=10).map(|i| Point::new(i as f64 / 10.0, 0.5)).collect();
        let templates = vec![
            (Swipe::Left, resample(&left, config.resolution)),
            (Swipe::Right, resample(&right, config.resolution)),
        ];
        Self {
            config,
            templates,
            stroke: Vec::new(),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.stroke.push(point);
    }

    pub fn stroke_len(&self) -> usize {
        self.stroke.len()
    }

    pub fn clear(&mut self) {
        self.stroke.clear();
    }

    /// Classify the captured stroke. On a match the stroke buffer is
    /// cleared; on no match it is left for the caller to decide disposition.
    pub fn recognize(&mut self) -> Option<Swipe> {
        if self.stroke.len() < MIN_STROKE_POINTS {
            return None;
        }

        let candidate = resample(&self.stroke, self.config.resolution);

        let mut best: Option<(Swipe, f64)> = None;
        for (label, template) in &self.templates {
            let score = mean_path_distance(&candidate, template);
            debug!(?label, score, "template score");
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((*label, score));
            }
        }

        let (label, score) = best?;
        if score < self.config.accept_threshold {
            self.stroke.clear();
            Some(label)
        } else {
            debug!(score, "no template under acceptance threshold");
            None
        }
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

/// Resample a polyline to exactly `n` points at equal arc-length intervals,
/// linearly interpolating between the original vertices.
pub fn resample(points: &[Point], n: usize) -> Vec<Point> {
    if points.len() < 2 || n < 2 {
        return points.to_vec();
    }

    let interval = path_length(points) / (n - 1) as f64;
    if interval <= 0.0 {
        // Zero-length stroke: every resampled point is the start point.
        return vec![points[0]; n];
    }

    let mut work = points.to_vec();
    let mut resampled = vec![work[0]];
    let mut walked = 0.0;

    let mut i = 1;
    while i < work.len() {
        let step = work[i - 1].distance_to(&work[i]);
        if walked + step >= interval {
            let t = (interval - walked) / step;
            let q = Point::new(
                work[i - 1].x + t * (work[i].x - work[i - 1].x),
                work[i - 1].y + t * (work[i].y - work[i - 1].y),
            );
            resampled.push(q);
            work.insert(i, q);
            walked = 0.0;
        } else {
            walked += step;
        }
        i += 1;
    }

    // The walk can fall one point short of the terminal vertex.
    if resampled.len() == n - 1 {
        resampled.push(work[work.len() - 1]);
    }

    resampled
}

fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

/// Mean pointwise distance between two equal-length paths. Mismatched
/// lengths are an unrecoverable classification failure, scored infinite.
fn mean_path_distance(a: &[Point], b: &[Point]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    let total: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(p, q)| p.distance_to(q))
        .sum();
    total / a.len() as f64
}

#[cfg(test)]
#[path = "tests/recognizer_tests.rs"]
mod tests;
