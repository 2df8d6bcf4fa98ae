//! Chart definitions and rendering
//!
//! Each report chart plots one metric against N with one line per
//! data-structure variant. The x axis is always log base 2; the y axis is
//! log scaled except for search time, where small differences matter.

use crate::aggregate::variants;
use crate::config::ImageFormat;
use crate::types::{AggregatedRecord, Metric, ReportError, Result};
use plotters::coord::ranged1d::{AsRangedCoord, DefaultFormatting, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::fmt;
use std::path::Path;

// Sizes are in pixels for a 1200x800 canvas (12x8 inches at 100 dpi)
const TITLE_FONT_SIZE: u32 = 22;
const AXIS_LABEL_FONT_SIZE: u32 = 17;
const TICK_LABEL_FONT_SIZE: u32 = 14;
const LEGEND_FONT_SIZE: u32 = 15;
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: u32 = 5;

/// Legend heading, drawn as an entry without a glyph
const LEGEND_TITLE: &str = "Data Structure";

const GRID_COLOR: RGBColor = RGBColor(221, 221, 221);
const LEGEND_BORDER_COLOR: RGBColor = RGBColor(204, 204, 204);

/// Series colours (the "deep" palette of the seaborn whitegrid theme)
const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

/// Dash patterns as (dash, gap) in pixels; `None` is a solid line
const DASHES: [Option<(u32, u32)>; 5] = [
    None,
    Some((12, 6)),
    Some((4, 4)),
    Some((16, 4)),
    Some((8, 3)),
];

const MARKERS: [Marker; 4] = [Marker::Circle, Marker::Cross, Marker::Triangle, Marker::Ring];

/// Axis scale of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// The three charts of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Average insertion time vs. N
    InsertionTime,
    /// Average search time vs. N
    SearchTime,
    /// Average height vs. N
    Height,
}

impl ChartKind {
    /// All charts in report order
    pub const ALL: [ChartKind; 3] = [ChartKind::InsertionTime, ChartKind::SearchTime, ChartKind::Height];

    /// 1-based position in the report
    pub fn number(&self) -> u8 {
        match self {
            ChartKind::InsertionTime => 1,
            ChartKind::SearchTime => 2,
            ChartKind::Height => 3,
        }
    }

    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::InsertionTime => "Insertion Time",
            ChartKind::SearchTime => "Search Time",
            ChartKind::Height => "Height",
        }
    }

    /// File name without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::InsertionTime => "1_insertion_time",
            ChartKind::SearchTime => "2_search_time",
            ChartKind::Height => "3_height",
        }
    }

    /// File name for the given image format
    pub fn file_name(&self, format: ImageFormat) -> String {
        format!("{}.{}", self.file_stem(), format.extension())
    }

    /// Chart caption
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::InsertionTime => "Average Insertion Time vs. Number of Nodes (N)",
            ChartKind::SearchTime => "Average Search Time vs. Number of Nodes (N)",
            ChartKind::Height => "Average Height vs. Number of Nodes (N)",
        }
    }

    /// X axis description
    pub fn x_label(&self) -> &'static str {
        "Number of Nodes (N)"
    }

    /// Y axis description
    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::InsertionTime => "Average Insertion Time (microseconds)",
            ChartKind::SearchTime => "100M Average Search Time (nanoseconds)",
            ChartKind::Height => "Average Height",
        }
    }

    /// Scale of the y axis; the x axis is always log base 2
    pub fn y_scale(&self) -> AxisScale {
        match self {
            ChartKind::SearchTime => AxisScale::Linear,
            ChartKind::InsertionTime | ChartKind::Height => AxisScale::Log,
        }
    }

    /// Metric plotted on the y axis
    pub fn metric(&self) -> Metric {
        match self {
            ChartKind::InsertionTime => Metric::InsertionTime,
            ChartKind::SearchTime => Metric::SearchTime,
            ChartKind::Height => Metric::Height,
        }
    }

    /// True if the chart is drawn without the excluded variants
    pub fn uses_filtered_view(&self) -> bool {
        !matches!(self, ChartKind::Height)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plot {}: {}", self.number(), self.name())
    }
}

/// Marker drawn at every data point of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Circle,
    Cross,
    Triangle,
    Ring,
}

/// Colour, dash pattern and marker of one series
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeriesStyle {
    color: RGBColor,
    dash: Option<(u32, u32)>,
    marker: Marker,
}

impl SeriesStyle {
    fn for_index(idx: usize) -> Self {
        Self {
            color: PALETTE[idx % PALETTE.len()],
            dash: DASHES[idx % DASHES.len()],
            marker: MARKERS[idx % MARKERS.len()],
        }
    }
}

/// One line of a chart: a variant label and its (N, value) points
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a> {
    pub label: &'a str,
    pub points: Vec<(f64, f64)>,
}

/// Split a table into one series per variant for the given chart
///
/// Points that cannot be placed on the chart's axes (non-finite values, or
/// non-positive values on a log axis) are skipped with a warning. Every
/// variant keeps its series, even if empty, so styles stay stable.
pub fn collect_series(records: &[AggregatedRecord], kind: ChartKind) -> Vec<Series<'_>> {
    let mut series: Vec<Series<'_>> = variants(records)
        .into_iter()
        .map(|label| Series {
            label,
            points: Vec::new(),
        })
        .collect();

    for record in records {
        let x = record.n as f64;
        let y = record.metric(kind.metric());

        let drawable = x > 0.0
            && y.is_finite()
            && (kind.y_scale() == AxisScale::Linear || y > 0.0);
        if !drawable {
            log::warn!(
                "{}: skipping point {} N={} {}={} (not drawable on this axis)",
                kind,
                record.data_structure,
                record.n,
                kind.metric(),
                y
            );
            continue;
        }

        if let Some(s) = series.iter_mut().find(|s| s.label == record.data_structure) {
            s.points.push((x, y));
        }
    }

    for s in &mut series {
        s.points.sort_by(|a, b| a.0.total_cmp(&b.0));
        log::debug!("{}: series {} has {} points", kind, s.label, s.points.len());
    }

    series
}

/// Render one chart to `path`
///
/// A table without drawable points still yields a chart with empty axes.
/// The drawing backend lives only for the duration of this call; the file is
/// flushed and the backend released before returning.
pub fn render_chart(
    kind: ChartKind,
    records: &[AggregatedRecord],
    path: &Path,
    format: ImageFormat,
    size: (u32, u32),
) -> Result<()> {
    let series = collect_series(records, kind);

    if series.iter().all(|s| s.points.is_empty()) {
        log::warn!("{}: no drawable data points, drawing empty axes", kind);
    }

    log::debug!("Rendering {} to {:?} ({}x{})", kind, path, size.0, size.1);

    match format {
        ImageFormat::Svg => draw_on(SVGBackend::new(path, size).into_drawing_area(), kind, &series),
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp => {
            draw_on(BitMapBackend::new(path, size).into_drawing_area(), kind, &series)
        }
    }
}

fn draw_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    kind: ChartKind,
    series: &[Series<'_>],
) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let xs = series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
    let ys = series.iter().flat_map(|s| s.points.iter().map(|p| p.1));

    let (x_min, x_max) = log_bounds(xs);
    let x_range = (x_min..x_max).log_scale().base(2.0);

    match kind.y_scale() {
        AxisScale::Log => {
            let (y_min, y_max) = log_bounds(ys);
            draw_chart(&root, kind, series, x_range, (y_min..y_max).log_scale())?;
        }
        AxisScale::Linear => {
            let (y_min, y_max) = linear_bounds(ys);
            draw_chart(&root, kind, series, x_range, y_min..y_max)?;
        }
    }

    root.present().map_err(render_error)?;
    Ok(())
}

fn draw_chart<DB, X, Y>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    series: &[Series<'_>],
    x_range: X,
    y_range: Y,
) -> Result<()>
where
    DB: DrawingBackend,
    X: AsRangedCoord<Value = f64>,
    X::CoordDescType: Ranged<FormatOption = DefaultFormatting> + ValueFormatter<f64>,
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let mut chart = ChartBuilder::on(root)
        .caption(kind.title(), ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .bold_line_style(GRID_COLOR)
        .light_line_style(WHITE)
        .x_desc(kind.x_label())
        .y_desc(kind.y_label())
        .x_label_formatter(&format_node_count)
        .y_label_formatter(&format_value)
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(std::iter::empty::<Circle<(f64, f64), u32>>())
        .map_err(render_error)?
        .label(LEGEND_TITLE)
        .legend(|(x, y)| PathElement::new(vec![(x, y)], WHITE));

    for (idx, s) in series.iter().enumerate() {
        if s.points.is_empty() {
            continue;
        }

        let style = SeriesStyle::for_index(idx);
        let line = style.color.stroke_width(LINE_WIDTH);

        let anno = match style.dash {
            None => chart.draw_series(LineSeries::new(s.points.clone(), line)),
            Some((dash, gap)) => {
                chart.draw_series(DashedLineSeries::new(s.points.clone(), dash, gap, line))
            }
        }
        .map_err(render_error)?;

        anno.label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

        let points = s.points.iter().copied();
        let markers = match style.marker {
            Marker::Circle => chart
                .draw_series(points.map(|p| Circle::new(p, MARKER_SIZE, style.color.filled())))
                .map(|_| ()),
            Marker::Ring => chart
                .draw_series(points.map(|p| Circle::new(p, MARKER_SIZE, line)))
                .map(|_| ()),
            Marker::Cross => chart
                .draw_series(points.map(|p| Cross::new(p, MARKER_SIZE, line)))
                .map(|_| ()),
            Marker::Triangle => chart
                .draw_series(points.map(|p| {
                    TriangleMarker::new(p, MARKER_SIZE + 1, style.color.filled())
                }))
                .map(|_| ()),
        };
        markers.map_err(render_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(LEGEND_BORDER_COLOR)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()
        .map_err(render_error)?;

    Ok(())
}

fn render_error<E: fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

/// Axis bounds for positive values on a log axis, padded by a quarter octave
///
/// Without any positive value the range falls back to 0.5..2.
fn log_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = min_max(values.filter(|v| *v > 0.0));
    if min >= max {
        return (min / 2.0, max * 2.0);
    }
    let pad = 2f64.powf(0.25);
    (min / pad, max * pad)
}

/// Axis bounds on a linear axis with a 5% margin on either side
fn linear_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = min_max(values);
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        max.abs().max(1.0) * 0.05
    };
    (min - pad, max + pad)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (1.0, 1.0)
    }
}

/// Tick label for N: powers of two as `2^k`, anything else as an integer
fn format_node_count(n: &f64) -> String {
    if *n >= 1.0 {
        let exp = n.log2().round();
        if (2f64.powf(exp) - n).abs() < 1e-6 * n {
            return format!("2^{}", exp as i64);
        }
    }
    format!("{:.0}", n)
}

/// Tick label for metric values, without trailing zeros
fn format_value(v: &f64) -> String {
    let text = format!("{:.3}", v);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
