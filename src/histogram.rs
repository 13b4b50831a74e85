use std::fs;
use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::network::PpiNetwork;

/// Appearance of the degree histogram
#[derive(Debug, Clone)]
pub struct HistogramStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Pixel size: a 6.4 x 4.8 inch figure at 300 DPI
    pub size: (u32, u32),
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self {
            title: "Degree Distribution of DM1 PPI Network".to_string(),
            x_label: "Degree".to_string(),
            y_label: "Frequency".to_string(),
            size: (1920, 1440),
        }
    }
}

/// Equal-width binned counts of node degrees
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeHistogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl DegreeHistogram {
    /// Bin the degree of every node in `network`.
    pub fn from_network(network: &PpiNetwork, bins: usize) -> Self {
        let degrees: Vec<usize> = network.degrees().into_iter().map(|(_, d)| d).collect();
        Self::from_degrees(&degrees, bins)
    }

    /// Bin `degrees` into `bins` equal-width bins over the observed range.
    ///
    /// Every bin is half-open except the last, which also holds the
    /// maximum. A single distinct value is widened to `[v - 0.5, v + 0.5]`
    /// and an empty input spans `[0, 1]`.
    pub fn from_degrees(degrees: &[usize], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = match (degrees.iter().min(), degrees.iter().max()) {
            (Some(&min), Some(&max)) if min == max => (min as f64 - 0.5, max as f64 + 0.5),
            (Some(&min), Some(&max)) => (min as f64, max as f64),
            _ => (0.0, 1.0),
        };

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let norm = bins as f64 / (hi - lo);
        let mut counts = vec![0usize; bins];
        for &d in degrees {
            let x = d as f64;
            let mut idx = (((x - lo) * norm).floor().max(0.0) as usize).min(bins - 1);
            // Rounding in `norm` can land one bin off; settle against the edges.
            if idx > 0 && x < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && x >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(lower edge, upper edge, count)` per bin
    pub fn iter_bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Render the histogram as a PNG, overwriting `output_path`.
    pub fn render_png(&self, output_path: &Path, style: &HistogramStyle) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
            }
        }

        let x_min = self.edges.first().copied().unwrap_or(0.0);
        let x_max = self.edges.last().copied().unwrap_or(1.0);
        let y_max = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

        // Drawing area is released when `root` drops at the end of scope.
        let root = BitMapBackend::new(output_path, style.size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&style.title, ("sans-serif", 48))
            .margin(30)
            .x_label_area_size(90)
            .y_label_area_size(120)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .label_style(("sans-serif", 28))
            .axis_desc_style(("sans-serif", 36))
            .draw()
            .map_err(plot_err)?;

        let bar = RGBColor(31, 119, 180);
        chart
            .draw_series(
                self.iter_bins()
                    .map(|(x0, x1, c)| Rectangle::new([(x0, 0.0), (x1, c as f64)], bar.filled())),
            )
            .map_err(plot_err)?;
        chart
            .draw_series(self.iter_bins().map(|(x0, x1, c)| {
                Rectangle::new([(x0, 0.0), (x1, c as f64)], BLACK.stroke_width(2))
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        debug!(path = %output_path.display(), bins = self.bins(), "rendered degree histogram");
        Ok(())
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}
