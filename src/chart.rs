//! Log-log scaling charts
//!
//! Two charts are produced per run:
//! - time per increment vs. thread count, with linear and quadratic guides
//! - average CAS attempts vs. thread count, with a linear guide
//!
//! Each input file becomes one line with markers. Series style cycles
//! through 10 colors and 10 marker shapes; the marker advances once per
//! full pass over the palette, so 100 files get 100 distinct styles.

use crate::config::GuideConfig;
use crate::table::LabeledSeries;
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};
use std::ops::Range;
use std::path::Path;

/// Matplotlib "tab10" palette
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const GUIDE_GRAY: RGBColor = RGBColor(0x80, 0x80, 0x80);

/// Marker radius in pixels
const MARKER_SIZE: f64 = 5.0;

/// Multiplicative margin around the data on each log axis
const AXIS_PADDING: f64 = 1.25;

/// Shapes used for data point markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleDown,
    TriangleUp,
    TriangleLeft,
    TriangleRight,
    Diamond,
    Pentagon,
    Star,
    Cross,
}

impl MarkerShape {
    pub const ALL: [MarkerShape; 10] = [
        MarkerShape::Circle,
        MarkerShape::Square,
        MarkerShape::TriangleDown,
        MarkerShape::TriangleUp,
        MarkerShape::TriangleLeft,
        MarkerShape::TriangleRight,
        MarkerShape::Diamond,
        MarkerShape::Pentagon,
        MarkerShape::Star,
        MarkerShape::Cross,
    ];

    /// Polygon outline centered on the origin, in pixel offsets (y grows down)
    pub fn outline(self, radius: f64) -> Vec<(i32, i32)> {
        let points = match self {
            MarkerShape::Circle => regular_polygon(16, radius, 0.0),
            MarkerShape::Square => regular_polygon(4, radius * 1.2, FRAC_PI_4),
            MarkerShape::TriangleDown => regular_polygon(3, radius * 1.2, FRAC_PI_2),
            MarkerShape::TriangleUp => regular_polygon(3, radius * 1.2, -FRAC_PI_2),
            MarkerShape::TriangleLeft => regular_polygon(3, radius * 1.2, PI),
            MarkerShape::TriangleRight => regular_polygon(3, radius * 1.2, 0.0),
            MarkerShape::Diamond => regular_polygon(4, radius * 1.2, -FRAC_PI_2),
            MarkerShape::Pentagon => regular_polygon(5, radius * 1.1, -FRAC_PI_2),
            MarkerShape::Star => star_polygon(radius * 1.3, radius * 0.55),
            MarkerShape::Cross => cross_polygon(radius * 1.1),
        };
        points
            .into_iter()
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect()
    }

    /// Outline translated to an absolute backend position
    fn outline_at(self, center: (i32, i32), radius: f64) -> Vec<(i32, i32)> {
        self.outline(radius)
            .into_iter()
            .map(|(x, y)| (x + center.0, y + center.1))
            .collect()
    }
}

fn regular_polygon(sides: usize, radius: f64, start: f64) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|i| {
            let angle = start + 2.0 * PI * i as f64 / sides as f64;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn star_polygon(outer: f64, inner: f64) -> Vec<(f64, f64)> {
    (0..10)
        .map(|i| {
            let angle = -FRAC_PI_2 + PI * i as f64 / 5.0;
            let r = if i % 2 == 0 { outer } else { inner };
            (r * angle.cos(), r * angle.sin())
        })
        .collect()
}

/// An "x": a plus sign rotated by 45 degrees
fn cross_polygon(size: f64) -> Vec<(f64, f64)> {
    let w = size / 3.0;
    let plus = [
        (w, size),
        (w, w),
        (size, w),
        (size, -w),
        (w, -w),
        (w, -size),
        (-w, -size),
        (-w, -w),
        (-size, -w),
        (-size, w),
        (-w, w),
        (-w, size),
    ];
    plus.iter()
        .map(|&(x, y)| ((x - y) * FRAC_1_SQRT_2, (x + y) * FRAC_1_SQRT_2))
        .collect()
}

/// Color and marker assigned to one input file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: MarkerShape,
}

/// Style for the `index`-th input file
pub fn series_style(index: usize) -> SeriesStyle {
    let color_idx = index % PALETTE.len();
    let marker_idx = (index + index / PALETTE.len()) % MarkerShape::ALL.len();
    SeriesStyle {
        color: PALETTE[color_idx],
        marker: MarkerShape::ALL[marker_idx],
    }
}

/// Dashed reference line `y = coefficient * x^exponent`
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub label: String,
    pub coefficient: f64,
    pub exponent: i32,
    pub color: RGBColor,
}

impl Guide {
    pub fn new(label: &str, coefficient: f64, exponent: i32, color: RGBColor) -> Self {
        Self {
            label: label.to_string(),
            coefficient,
            exponent,
            color,
        }
    }

    /// End points over `[min, max]`; a power law is straight on log-log axes
    pub fn points(&self, (min, max): (f64, f64)) -> Vec<(f64, f64)> {
        [min, max]
            .into_iter()
            .map(|x| (x, self.coefficient * x.powi(self.exponent)))
            .collect()
    }
}

/// One plotted file
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

/// Everything needed to draw one scaling chart
#[derive(Debug, Clone)]
pub struct ScalingChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub series: Vec<ChartSeries>,
    pub guides: Vec<Guide>,
}

impl ScalingChart {
    /// Time per increment vs. threads
    pub fn time(series: &[LabeledSeries], guides: &GuideConfig) -> Self {
        Self::build(
            "CAS Scaling: Time vs Threads",
            "Time per thread per increment (s)",
            series,
            |s| &s.log.times,
            vec![
                Guide::new("y ∝ x", guides.time_linear, 1, GUIDE_GRAY),
                Guide::new("y ∝ x²", guides.time_quadratic, 2, BLACK),
            ],
        )
    }

    /// Average attempts per increment vs. threads
    pub fn attempts(series: &[LabeledSeries], guides: &GuideConfig) -> Self {
        Self::build(
            "CAS Scaling: Attempts vs Threads",
            "Avg CAS attempts per increment",
            series,
            |s| &s.log.attempts,
            vec![Guide::new("y ∝ x", guides.attempts_linear, 1, GUIDE_GRAY)],
        )
    }

    fn build(
        title: &str,
        y_desc: &str,
        series: &[LabeledSeries],
        values: impl Fn(&LabeledSeries) -> &Vec<f64>,
        guides: Vec<Guide>,
    ) -> Self {
        let series = series
            .iter()
            .enumerate()
            .map(|(idx, s)| ChartSeries {
                label: s.label.clone(),
                // Non-positive values have no place on a log axis
                points: s
                    .log
                    .threads
                    .iter()
                    .zip(values(s))
                    .map(|(&t, &v)| (t as f64, v))
                    .filter(|&(x, y)| x > 0.0 && y > 0.0 && y.is_finite())
                    .collect(),
                style: series_style(idx),
            })
            .collect();

        Self {
            title: title.to_string(),
            x_desc: "Number of Threads".to_string(),
            y_desc: y_desc.to_string(),
            series,
            guides,
        }
    }

    /// Smallest and largest plotted thread count
    pub fn thread_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }

    /// True when at least one point can be drawn
    pub fn has_points(&self) -> bool {
        self.series.iter().any(|s| !s.points.is_empty())
    }

    pub fn x_range(&self) -> Option<Range<f64>> {
        self.thread_bounds().map(padded_log_range)
    }

    pub fn y_range(&self) -> Option<Range<f64>> {
        let threads = self.thread_bounds()?;
        let data = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let guides = self
            .guides
            .iter()
            .flat_map(|g| g.points(threads).into_iter().map(|p| p.1));
        bounds(data.chain(guides)).map(padded_log_range)
    }

    /// Draw the chart to a PNG file, replacing any existing image
    pub fn render_png(&self, path: &Path, (width, height): (u32, u32)) -> Result<()> {
        let (Some(threads), Some(x_range), Some(y_range)) =
            (self.thread_bounds(), self.x_range(), self.y_range())
        else {
            return Err(anyhow!("No plottable points for chart '{}'", self.title));
        };
        let draw_err = |e: &dyn std::fmt::Display| {
            anyhow!("Failed to draw chart {}: {}", path.display(), e)
        };

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_err(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
            .map_err(|e| draw_err(&e))?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .draw()
            .map_err(|e| draw_err(&e))?;

        for series in &self.series {
            let SeriesStyle { color, marker } = series.style;
            let outline = marker.outline(MARKER_SIZE);

            chart
                .draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(|e| draw_err(&e))?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    Polygon::new(marker.outline_at((x + 10, y), MARKER_SIZE), color.filled())
                });

            chart
                .draw_series(series.points.iter().map(|&p| {
                    EmptyElement::at(p) + Polygon::new(outline.clone(), color.filled())
                }))
                .map_err(|e| draw_err(&e))?;
        }

        for guide in &self.guides {
            let color = guide.color;
            chart
                .draw_series(DashedLineSeries::new(
                    guide.points(threads),
                    6,
                    4,
                    color.stroke_width(1),
                ))
                .map_err(|e| draw_err(&e))?
                .label(guide.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_err(&e))?;

        root.present().map_err(|e| draw_err(&e))?;
        tracing::debug!("Wrote chart {}", path.display());
        Ok(())
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Pad a positive `[min, max]` range by a constant factor on a log scale
fn padded_log_range((min, max): (f64, f64)) -> Range<f64> {
    let (min, max) = if min == max {
        (min / 2.0, max * 2.0)
    } else {
        (min, max)
    };
    (min / AXIS_PADDING)..(max * AXIS_PADDING)
}
