//! Sparkline geometry and rendering
//!
//! Samples are normalized linearly into a `width` x `height` viewport: the
//! first sample sits at x = 0, the last at x = width, the minimum at
//! y = height and the maximum at y = 0.

use crate::constants::{TREND_DOWN_COLOR, TREND_UP_COLOR};
use std::fmt::Write;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Maps samples to polyline vertices inside the viewport
pub fn sparkline_points(samples: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if samples.is_empty() {
        return Vec::new();
    }

    let (min, range) = min_and_range(samples);
    let step = if samples.len() > 1 {
        width / (samples.len() - 1) as f64
    } else {
        0.0
    };

    samples
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = i as f64 * step;
            let y = height - (value - min) / range * height;
            (x, y)
        })
        .collect()
}

/// Renders an SVG with a single open polyline
///
/// Empty input yields an empty placeholder of the same size.
pub fn render_svg(samples: &[f64], width: f64, height: f64, stroke: &str) -> String {
    let mut svg = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
        w = width,
        h = height
    );

    let points = sparkline_points(samples, width, height);
    if !points.is_empty() {
        let coords = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            stroke, coords
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Stroke color for a series: up when the last sample is at or above the first
pub fn trend_color(samples: &[f64]) -> &'static str {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if last < first => TREND_DOWN_COLOR,
        _ => TREND_UP_COLOR,
    }
}

/// Renders a unicode block sparkline `columns` wide
///
/// Samples are averaged into equal buckets when there are more than `columns`.
pub fn render_blocks(samples: &[f64], columns: usize) -> String {
    if samples.is_empty() || columns == 0 {
        return String::new();
    }

    let buckets: Vec<f64> = if samples.len() <= columns {
        samples.to_vec()
    } else {
        (0..columns)
            .map(|c| {
                let start = c * samples.len() / columns;
                let end = ((c + 1) * samples.len() / columns).max(start + 1);
                let bucket = &samples[start..end];
                bucket.iter().sum::<f64>() / bucket.len() as f64
            })
            .collect()
    };

    let (min, range) = min_and_range(&buckets);
    let top = (BLOCKS.len() - 1) as f64;
    buckets
        .iter()
        .map(|value| {
            let level = ((value - min) / range * top).round() as usize;
            BLOCKS[level.min(BLOCKS.len() - 1)]
        })
        .collect()
}

/// Minimum and value range, with a flat series given a range of 1
fn min_and_range(samples: &[f64]) -> (f64, f64) {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    (min, if range == 0.0 { 1.0 } else { range })
}
