//! Rendering a [`Distribution`] for people.
//!
//! The library computes the distribution; how it is shown is up to a
//! [`HistogramPresenter`]. [`TextPresenter`] draws a bar chart with the
//! smoothed density overlaid, sized to a terminal.
//!
//! # Example
//!
//! ```rust
//! use chathisto::config::{ChartConfig, HistogramConfig};
//! use chathisto::histogram::Distribution;
//! use chathisto::present::{HistogramPresenter, TextPresenter};
//!
//! let distribution = Distribution::from_timestamps(&[1609495200, 1609495500, 1609495800], 30)?;
//!
//! let mut presenter = TextPresenter::new(Vec::new()).with_chart(ChartConfig::new().with_width(30));
//! presenter.present(&distribution, &HistogramConfig::new())?;
//!
//! let chart = String::from_utf8(presenter.into_inner())?;
//! assert!(chart.starts_with("# messages from Jan 01, 2021 to Jan 01, 2021:\n3\n"));
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use std::io::Write;

use crate::config::{ChartConfig, HistogramConfig};
use crate::error::Result;
use crate::histogram::{Distribution, Histogram};

const BAR: char = '█';
const DENSITY: char = '•';

/// Something that can show a distribution.
pub trait HistogramPresenter {
    /// Shows `distribution`, with dates rendered per `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written or the presenter's
    /// own settings are invalid.
    fn present(&mut self, distribution: &Distribution, config: &HistogramConfig) -> Result<()>;
}

/// Draws a text chart to any writer.
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: W,
    chart: ChartConfig,
}

impl<W: Write> TextPresenter<W> {
    /// Creates a presenter with the default chart size.
    pub fn new(out: W) -> Self {
        Self {
            out,
            chart: ChartConfig::default(),
        }
    }

    /// Sets the chart size.
    #[must_use]
    pub fn with_chart(mut self, chart: ChartConfig) -> Self {
        self.chart = chart;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, histogram: &Histogram, config: &HistogramConfig) -> Result<()> {
        let columns = fold_columns(histogram, self.chart.width);
        let height = self.chart.height;

        let peak = columns
            .iter()
            .map(|c| c.density.unwrap_or(0.0).max(c.count as f64))
            .fold(0.0_f64, f64::max)
            .max(1.0);

        let bar_rows: Vec<usize> = columns
            .iter()
            .map(|c| {
                if c.count == 0 {
                    0
                } else {
                    ((c.count as f64 / peak * height as f64).round() as usize).clamp(1, height)
                }
            })
            .collect();
        let density_rows: Vec<Option<usize>> = columns
            .iter()
            .map(|c| {
                c.density
                    .map(|d| ((d / peak * height as f64).round() as usize).min(height))
            })
            .collect();

        let top_label = format_count(peak);
        let gutter = top_label.len();

        writeln!(self.out, "{}", histogram.title(&config.display_format))?;
        writeln!(self.out)?;

        for row in (1..=height).rev() {
            let label = if row == height { top_label.as_str() } else { "" };
            let cells: String = bar_rows
                .iter()
                .zip(&density_rows)
                .map(|(&bar, &density)| {
                    if bar >= row {
                        BAR
                    } else if density == Some(row) {
                        DENSITY
                    } else {
                        ' '
                    }
                })
                .collect();
            writeln!(self.out, "{label:>gutter$} │{}", cells.trim_end())?;
        }

        writeln!(self.out, "{:>gutter$} └{}", 0, "─".repeat(columns.len()))?;

        let middle = histogram.min() + (histogram.max() - histogram.min()) / 2;
        let labels = axis_labels(
            &histogram.render_date(histogram.min(), &config.display_format),
            &histogram.render_date(middle, &config.display_format),
            &histogram.render_date(histogram.max(), &config.display_format),
            columns.len(),
        );
        writeln!(self.out, "{:gutter$}  {labels}", "")?;
        writeln!(self.out)?;

        let mut legend = format!(
            "{BAR} messages per {} ({} bins",
            human_duration(histogram.bin_width()),
            histogram.bins().len()
        );
        if columns.len() < histogram.bins().len() {
            legend.push_str(&format!(" in {} columns", columns.len()));
        }
        legend.push(')');
        if histogram.has_density() {
            legend.push_str(&format!("   {DENSITY} smoothed"));
        }
        writeln!(self.out, "{legend}")?;

        Ok(())
    }
}

impl<W: Write> HistogramPresenter for TextPresenter<W> {
    fn present(&mut self, distribution: &Distribution, config: &HistogramConfig) -> Result<()> {
        self.chart.validate()?;
        match distribution {
            Distribution::NoData => {
                writeln!(self.out, "No messages found: nothing to plot.")?;
            }
            Distribution::Binned(histogram) => self.draw(histogram, config)?,
        }
        self.out.flush()?;
        Ok(())
    }
}

/// A screen column: one or more adjacent bins.
#[derive(Debug, Clone, PartialEq)]
struct Column {
    count: usize,
    density: Option<f64>,
}

/// Merges bins into at most `width` columns of near-equal size.
fn fold_columns(histogram: &Histogram, width: usize) -> Vec<Column> {
    let bins = histogram.bins();
    let columns = bins.len().min(width).max(1);

    (0..columns)
        .map(|j| {
            let group = &bins[j * bins.len() / columns..(j + 1) * bins.len() / columns];
            Column {
                count: group.iter().map(|b| b.count).sum(),
                density: group
                    .iter()
                    .map(|b| b.density)
                    .sum::<Option<f64>>(),
            }
        })
        .collect()
}

/// Lays out start, middle and end labels on one line of `width` cells.
///
/// Labels that would collide are dropped, middle first.
fn axis_labels(start: &str, middle: &str, end: &str, width: usize) -> String {
    let mut line = vec![' '; width];
    let start_len = start.chars().count();
    let middle_len = middle.chars().count();
    let end_len = end.chars().count();

    place(&mut line, 0, start);

    let end_at = width.saturating_sub(end_len);
    let end_fits = end_at > start_len;
    if end_fits {
        place(&mut line, end_at, end);
    }

    let middle_at = width.saturating_sub(middle_len) / 2;
    let right_limit = if end_fits { end_at } else { width };
    if middle_at > start_len && middle_at + middle_len < right_limit {
        place(&mut line, middle_at, middle);
    }

    line.into_iter().collect::<String>().trim_end().to_string()
}

fn place(line: &mut [char], at: usize, text: &str) {
    for (slot, ch) in line.iter_mut().skip(at).zip(text.chars()) {
        *slot = ch;
    }
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Formats a number of seconds with the largest fitting unit.
fn human_duration(seconds: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(86_400.0, "d"), (3_600.0, "h"), (60.0, "min"), (1.0, "s")];

    for (size, unit) in UNITS {
        if seconds >= size {
            let value = seconds / size;
            return if (value - value.round()).abs() < 0.05 {
                format!("{:.0} {unit}", value.round())
            } else {
                format!("{value:.1} {unit}")
            };
        }
    }
    format!("{seconds:.2} s")
}
