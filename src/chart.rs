//! PNG bar charts for the trainer's feature importances and the predictor's
//! activity-hours comparison.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::ChartError;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const MARGIN: u32 = 60;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const DEFAULT_BAR: Rgb<u8> = Rgb([0x1f, 0x77, 0xb4]);

/// Study, social media, Netflix, sleep.
pub const ACTIVITY_COLORS: [Rgb<u8>; 4] = [
    Rgb([0x1f, 0x77, 0xb4]),
    Rgb([0xff, 0x7f, 0x0e]),
    Rgb([0x2c, 0xa0, 0x2c]),
    Rgb([0x94, 0x67, 0xbd]),
];

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..y1.min(img.height()) {
        for x in x0..x1.min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn canvas() -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    // x axis along the bottom margin, y axis along the left margin
    fill_rect(&mut img, MARGIN, HEIGHT - MARGIN, WIDTH - MARGIN, HEIGHT - MARGIN + 2, AXIS);
    fill_rect(&mut img, MARGIN - 2, MARGIN, MARGIN, HEIGHT - MARGIN + 2, AXIS);
    img
}

// Fraction of the axis a value covers; non-finite and negative values draw nothing.
fn fraction(value: f64, max: f64) -> f64 {
    if value.is_finite() && max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn save(img: &RgbImage, path: &Path) -> Result<(), ChartError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    debug!("Wrote chart {}", path.display());
    Ok(())
}

/// One horizontal bar per value, the first value at the bottom. Bar length is
/// relative to the largest value.
pub fn horizontal_bars(values: &[f64]) -> Result<RgbImage, ChartError> {
    if values.is_empty() {
        return Err(ChartError::Empty);
    }
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
    let mut img = canvas();

    let plot_width = WIDTH - 2 * MARGIN;
    let slot = (HEIGHT - 2 * MARGIN) as f64 / values.len() as f64;
    for (index, &value) in values.iter().enumerate() {
        let bottom = (HEIGHT - MARGIN) as f64 - index as f64 * slot;
        let y0 = (bottom - slot * 0.9) as u32;
        let y1 = (bottom - slot * 0.1) as u32;
        let length = (fraction(value, max) * plot_width as f64) as u32;
        fill_rect(&mut img, MARGIN, y0, MARGIN + length, y1, DEFAULT_BAR);
    }
    Ok(img)
}

/// One vertical bar per value on a y axis running from 0 to `y_max`.
pub fn vertical_bars(values: &[f64], colors: &[Rgb<u8>], y_max: f64) -> Result<RgbImage, ChartError> {
    if values.is_empty() {
        return Err(ChartError::Empty);
    }
    let mut img = canvas();

    let plot_height = HEIGHT - 2 * MARGIN;
    let slot = (WIDTH - 2 * MARGIN) as f64 / values.len() as f64;
    for (index, &value) in values.iter().enumerate() {
        let left = MARGIN as f64 + index as f64 * slot;
        let x0 = (left + slot * 0.1) as u32;
        let x1 = (left + slot * 0.9) as u32;
        let height = (fraction(value, y_max) * plot_height as f64) as u32;
        let color = colors.get(index).copied().unwrap_or(DEFAULT_BAR);
        fill_rect(&mut img, x0, HEIGHT - MARGIN - height, x1, HEIGHT - MARGIN, color);
    }
    Ok(img)
}

/// Upper bound of the activity chart's y axis: one hour above the largest value.
pub fn activity_axis_max(hours: &[f64]) -> f64 {
    hours.iter().copied().fold(0.0, f64::max) + 1.0
}

pub fn render_feature_importance<P: AsRef<Path>>(path: P, importances: &[f64]) -> Result<(), ChartError> {
    save(&horizontal_bars(importances)?, path.as_ref())
}

pub fn render_activity_hours<P: AsRef<Path>>(path: P, hours: &[f64; 4]) -> Result<(), ChartError> {
    let img = vertical_bars(hours, &ACTIVITY_COLORS, activity_axis_max(hours))?;
    save(&img, path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_max_is_one_above_largest() {
        assert_eq!(activity_axis_max(&[2.0, 2.0, 1.0, 7.0]), 8.0);
        assert_eq!(activity_axis_max(&[0.0, 0.0, 0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_empty_chart_is_rejected() {
        assert!(matches!(horizontal_bars(&[]), Err(ChartError::Empty)));
        assert!(matches!(vertical_bars(&[], &[], 1.0), Err(ChartError::Empty)));
    }

    #[test]
    fn test_tallest_bar_stops_below_axis_top() {
        let hours = [2.0, 2.0, 1.0, 7.0];
        let img = vertical_bars(&hours, &ACTIVITY_COLORS, activity_axis_max(&hours)).unwrap();
        let plot_height = (HEIGHT - 2 * MARGIN) as f64;
        let sleep_x = MARGIN + (WIDTH - 2 * MARGIN) * 7 / 8;
        let top = HEIGHT - MARGIN - (plot_height * 7.0 / 8.0) as u32;

        assert_eq!(*img.get_pixel(sleep_x, top), ACTIVITY_COLORS[3]);
        assert_eq!(*img.get_pixel(sleep_x, top - 2), BACKGROUND);
        let study_x = MARGIN + (WIDTH - 2 * MARGIN) / 8;
        assert_eq!(*img.get_pixel(study_x, HEIGHT - MARGIN - 1), ACTIVITY_COLORS[0]);
    }

    #[test]
    fn test_largest_importance_spans_plot() {
        let img = horizontal_bars(&[0.25, 0.75]).unwrap();
        let slot = (HEIGHT - 2 * MARGIN) / 2;
        let second_row = HEIGHT - MARGIN - slot - slot / 2;
        let first_row = HEIGHT - MARGIN - slot / 2;

        assert_eq!(*img.get_pixel(WIDTH - MARGIN - 1, second_row), DEFAULT_BAR);
        assert_eq!(*img.get_pixel(WIDTH - MARGIN - 1, first_row), BACKGROUND);
        assert_eq!(*img.get_pixel(MARGIN + 10, first_row), DEFAULT_BAR);
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("activity.png");
        render_activity_hours(&path, &[2.0, 2.0, 1.0, 7.0]).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
