//! Binned time distribution of a timeline.
//!
//! [`Distribution::from_timestamps`] turns the numeric time axis into
//! equal-width buckets spanning the observed range, plus a smoothed
//! density curve scaled to the same units as the counts. An empty axis is
//! [`Distribution::NoData`], never an error.
//!
//! # Example
//!
//! ```rust
//! use chathisto::histogram::Distribution;
//!
//! let distribution = Distribution::from_timestamps(&[0, 10, 20, 30, 40], 4)?;
//! let histogram = distribution.histogram().unwrap();
//!
//! let counts: Vec<_> = histogram.bins().iter().map(|b| b.count).collect();
//! assert_eq!(counts, [1, 1, 1, 2]);
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use std::f64::consts::PI;

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::config::{HistogramConfig, check_bin_count};
use crate::error::Result;
use crate::message::DisplayFormat;
use crate::timeline::Timeline;

/// Kernel contributions beyond this many bandwidths are ignored.
const KERNEL_CUTOFF: f64 = 8.0;

/// The result of binning a timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// The timeline had no records.
    NoData,
    /// At least one record was binned.
    Binned(Histogram),
}

impl Distribution {
    /// Bins epoch seconds into `bin_count` equal-width buckets.
    ///
    /// Timestamps are taken in timeline order; the first and last entries
    /// become the histogram's title range.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidConfig`](crate::ChathistoError::InvalidConfig) if `bin_count` is zero or
    /// above [`MAX_BIN_COUNT`](crate::config::MAX_BIN_COUNT).
    pub fn from_timestamps(timestamps: &[i64], bin_count: usize) -> Result<Self> {
        check_bin_count(bin_count)?;

        let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
            return Ok(Distribution::NoData);
        };

        let (min, max) = timestamps
            .iter()
            .fold((first, first), |(lo, hi), &t| (lo.min(t), hi.max(t)));

        // A single instant still gets a one-second span to divide.
        let span = if max > min { max.abs_diff(min) as f64 } else { 1.0 };
        let bin_width = span / bin_count as f64;

        let mut counts = vec![0usize; bin_count];
        for &t in timestamps {
            let index = (t.abs_diff(min) as f64 / bin_width) as usize;
            counts[index.min(bin_count - 1)] += 1;
        }

        let densities = if max > min {
            kernel_density(timestamps, min, bin_count, bin_width)
        } else {
            vec![None; bin_count]
        };

        let origin = min as f64;
        let bins = counts
            .into_iter()
            .zip(densities)
            .enumerate()
            .map(|(i, (count, density))| Bin {
                start: origin + i as f64 * bin_width,
                end: origin + (i + 1) as f64 * bin_width,
                count,
                density,
            })
            .collect();

        Ok(Distribution::Binned(Histogram {
            bins,
            total: timestamps.len(),
            min,
            max,
            first,
            last,
            bin_width,
            offset: Utc.fix(),
        }))
    }

    /// Bins a timeline, keeping its offset for rendering dates.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidConfig`](crate::ChathistoError::InvalidConfig) if the configuration is
    /// invalid.
    pub fn from_timeline(timeline: &Timeline, config: &HistogramConfig) -> Result<Self> {
        config.validate()?;
        let distribution = Self::from_timestamps(&timeline.epoch_seconds(), config.bin_count)?;
        Ok(match distribution {
            Distribution::Binned(histogram) => {
                Distribution::Binned(histogram.with_offset(timeline.offset()))
            }
            Distribution::NoData => Distribution::NoData,
        })
    }

    /// Returns `true` if there was nothing to bin.
    pub fn is_empty(&self) -> bool {
        matches!(self, Distribution::NoData)
    }

    /// Returns the number of binned timestamps.
    pub fn total(&self) -> usize {
        self.histogram().map_or(0, Histogram::total)
    }

    /// Returns the histogram, if there is one.
    pub fn histogram(&self) -> Option<&Histogram> {
        match self {
            Distribution::Binned(histogram) => Some(histogram),
            Distribution::NoData => None,
        }
    }
}

/// One bucket of the histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    /// Inclusive lower edge, epoch seconds
    pub start: f64,
    /// Upper edge, epoch seconds; exclusive except for the last bin
    pub end: f64,
    /// Number of timestamps in the bucket
    pub count: usize,
    /// Smoothed estimate in count units, when one could be computed
    pub density: Option<f64>,
}

impl Bin {
    /// Returns the bucket midpoint in epoch seconds.
    pub fn centre(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Returns the lower edge rounded down to whole seconds.
    pub fn start_seconds(&self) -> i64 {
        self.start.floor() as i64
    }

    /// Returns the upper edge rounded down to whole seconds.
    pub fn end_seconds(&self) -> i64 {
        self.end.floor() as i64
    }
}

/// Equal-width buckets over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
    total: usize,
    min: i64,
    max: i64,
    first: i64,
    last: i64,
    bin_width: f64,
    offset: FixedOffset,
}

impl Histogram {
    /// Sets the offset dates are rendered in.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Returns the number of binned timestamps.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the smallest timestamp.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Returns the largest timestamp.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Returns the first timestamp in timeline order.
    pub fn first(&self) -> i64 {
        self.first
    }

    /// Returns the last timestamp in timeline order.
    pub fn last(&self) -> i64 {
        self.last
    }

    /// Returns the width of every bucket in seconds.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the largest bucket count.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Returns `true` if a density curve was computed.
    pub fn has_density(&self) -> bool {
        self.bins.iter().any(|b| b.density.is_some())
    }

    /// Renders epoch seconds in this histogram's offset.
    pub fn render_date(&self, seconds: i64, format: &DisplayFormat) -> String {
        format
            .render_epoch(seconds, self.offset)
            .unwrap_or_else(|| seconds.to_string())
    }

    /// Returns the chart title: the first and last dates of the timeline,
    /// then the record count on its own line.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::histogram::Distribution;
    /// use chathisto::DisplayFormat;
    ///
    /// let distribution = Distribution::from_timestamps(&[1559129190, 1609495200], 10)?;
    /// let title = distribution.histogram().unwrap().title(&DisplayFormat::default());
    /// assert_eq!(title, "# messages from May 29, 2019 to Jan 01, 2021:\n2");
    /// # Ok::<(), chathisto::ChathistoError>(())
    /// ```
    pub fn title(&self, format: &DisplayFormat) -> String {
        format!(
            "# messages from {} to {}:\n{}",
            self.render_date(self.first, format),
            self.render_date(self.last, format),
            self.total
        )
    }
}

/// Gaussian kernel density at each bucket centre, scaled to counts.
///
/// Bandwidth follows Scott's rule, `sigma * n^(-1/5)`. Callers guarantee at
/// least two distinct values.
fn kernel_density(
    timestamps: &[i64],
    min: i64,
    bin_count: usize,
    bin_width: f64,
) -> Vec<Option<f64>> {
    let mut points: Vec<f64> = timestamps
        .iter()
        .map(|&t| t as f64 - min as f64)
        .collect();
    points.sort_by(f64::total_cmp);

    let n = points.len() as f64;
    let mean = points.iter().sum::<f64>() / n;
    let variance = points.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let bandwidth = variance.sqrt() * n.powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return vec![None; bin_count];
    }

    let scale = bin_width / (bandwidth * (2.0 * PI).sqrt());
    let reach = KERNEL_CUTOFF * bandwidth;

    (0..bin_count)
        .map(|i| {
            let centre = (i as f64 + 0.5) * bin_width;
            let lo = points.partition_point(|&x| x < centre - reach);
            let hi = points.partition_point(|&x| x <= centre + reach);
            let sum: f64 = points[lo..hi]
                .iter()
                .map(|&x| (-0.5 * ((centre - x) / bandwidth).powi(2)).exp())
                .sum();
            Some(sum * scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_BIN_COUNT;

    fn binned(timestamps: &[i64], bins: usize) -> Histogram {
        match Distribution::from_timestamps(timestamps, bins).unwrap() {
            Distribution::Binned(h) => h,
            Distribution::NoData => panic!("expected a histogram"),
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        let distribution = Distribution::from_timestamps(&[], 900).unwrap();
        assert!(distribution.is_empty());
        assert_eq!(distribution.total(), 0);
        assert!(distribution.histogram().is_none());
    }

    #[test]
    fn test_oversized_bin_count_rejected() {
        let err = Distribution::from_timestamps(&[0, 100], usize::MAX).unwrap_err();
        assert!(err.is_invalid_config());
        assert!(Distribution::from_timestamps(&[0, 100], MAX_BIN_COUNT + 1).is_err());
        assert!(Distribution::from_timestamps(&[], usize::MAX).is_err());

        let histogram = binned(&[0, 100], MAX_BIN_COUNT);
        assert_eq!(histogram.bins().len(), MAX_BIN_COUNT);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = Distribution::from_timestamps(&[1, 2], 0).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_counts_sum_to_total() {
        let timestamps: Vec<i64> = (0..1000).map(|i| 1_600_000_000 + i * i * 37).collect();
        let histogram = binned(&timestamps, 900);
        assert_eq!(histogram.bins().len(), 900);
        let sum: usize = histogram.bins().iter().map(|b| b.count).sum();
        assert_eq!(sum, 1000);
        assert_eq!(histogram.total(), 1000);
    }

    #[test]
    fn test_last_bin_includes_max() {
        let histogram = binned(&[0, 100], 10);
        assert_eq!(histogram.bins()[0].count, 1);
        assert_eq!(histogram.bins()[9].count, 1);
        assert_eq!(histogram.bins()[9].end, 100.0);
    }

    #[test]
    fn test_edges_are_equal_width() {
        let histogram = binned(&[1000, 1600], 3);
        let edges: Vec<_> = histogram.bins().iter().map(|b| (b.start, b.end)).collect();
        assert_eq!(edges, [(1000.0, 1200.0), (1200.0, 1400.0), (1400.0, 1600.0)]);
        assert_eq!(histogram.bin_width(), 200.0);
    }

    #[test]
    fn test_identical_timestamps_widen_span() {
        let histogram = binned(&[1609495200; 5], 4);
        assert_eq!(histogram.bins()[0].count, 5);
        assert_eq!(histogram.bin_width(), 0.25);
        assert!(!histogram.has_density());
    }

    #[test]
    fn test_single_timestamp() {
        let histogram = binned(&[42], 900);
        assert_eq!(histogram.total(), 1);
        assert_eq!(histogram.max_count(), 1);
        assert_eq!((histogram.min(), histogram.max()), (42, 42));
    }

    #[test]
    fn test_negative_epochs() {
        let histogram = binned(&[-86_400, 0, 86_400], 2);
        let counts: Vec<_> = histogram.bins().iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 2]);
    }

    #[test]
    fn test_density_peaks_at_cluster() {
        let mut timestamps = vec![0, 10_000];
        timestamps.extend((0..200).map(|i| 5_000 + (i % 20) - 10));
        let histogram = binned(&timestamps, 10);
        assert!(histogram.has_density());

        let densities: Vec<f64> = histogram.bins().iter().map(|b| b.density.unwrap()).collect();
        assert!(densities.iter().all(|d| d.is_finite() && *d >= 0.0));

        let peak = densities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak == 4 || peak == 5);
    }

    #[test]
    fn test_density_mass_close_to_total() {
        // symmetric bell well inside the range
        let mut timestamps = vec![0, 100_000];
        for i in 0..2000i64 {
            timestamps.push(50_000 + ((i * 7919) % 4001) - 2000);
        }
        let histogram = binned(&timestamps, 200);
        let mass: f64 = histogram.bins().iter().filter_map(|b| b.density).sum();
        let total = histogram.total() as f64;
        assert!((mass - total).abs() / total < 0.05, "mass {mass} vs {total}");
    }

    #[test]
    fn test_title_uses_timeline_order() {
        let histogram = binned(&[1609495800, 1609495200], 10);
        let format = DisplayFormat::new("%Y-%m-%d %H:%M").unwrap();
        assert_eq!(
            histogram.title(&format),
            "# messages from 2021-01-01 10:10 to 2021-01-01 10:00:\n2"
        );
    }

    #[test]
    fn test_title_in_offset() {
        let histogram =
            binned(&[1609495200], 1).with_offset(FixedOffset::east_opt(3 * 3600).unwrap());
        let format = DisplayFormat::new("%H:%M").unwrap();
        assert_eq!(histogram.title(&format), "# messages from 13:00 to 13:00:\n1");
    }

    #[test]
    fn test_bin_helpers() {
        let bin = Bin {
            start: 10.5,
            end: 20.5,
            count: 1,
            density: None,
        };
        assert_eq!(bin.centre(), 15.5);
        assert_eq!(bin.start_seconds(), 10);
        assert_eq!(bin.end_seconds(), 20);
    }
}
