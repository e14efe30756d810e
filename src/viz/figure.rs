use crate::color::Rgb;

use super::stats::{BoxStats, HistogramBin};
use super::ChartKind;

// ---------------------------------------------------------------------------
// Figure – a renderer-independent chart description
// ---------------------------------------------------------------------------

/// A composed chart: one or more panels stacked vertically.
///
/// Both the egui view and the image exporter draw from this, so it carries
/// data and styling only, never backend handles.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub panels: Vec<Panel>,
    /// Height of one panel in pixels.
    pub panel_height: u32,
}

impl Figure {
    pub fn trace_count(&self) -> usize {
        self.panels.iter().map(|p| p.traces.len()).sum()
    }
}

/// Name of the category at position `v` on a categorical axis. Only
/// integral positions carry a label; anything else is blank.
pub fn label_at(labels: &[String], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub traces: Vec<Trace>,
}

impl Panel {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Panel {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            traces: Vec::new(),
        }
    }

    /// Data extent as `(x_min, x_max, y_min, y_max)`, widened where a side
    /// would otherwise be empty. `None` for panels without cartesian data.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut b = Bounds::default();
        for (i, trace) in self.traces.iter().enumerate() {
            match &trace.geometry {
                Geometry::Line(pts) | Geometry::Markers(pts) => {
                    for p in pts {
                        b.add(p[0], p[1]);
                    }
                }
                Geometry::Bars(bars) => {
                    for p in bars {
                        b.add(p[0] - 0.5, 0.0);
                        b.add(p[0] + 0.5, p[1]);
                    }
                }
                Geometry::Histogram(bins) => {
                    for bin in bins {
                        b.add(bin.start, 0.0);
                        b.add(bin.end, bin.count as f64);
                    }
                }
                Geometry::Box(stats) => {
                    let x = i as f64;
                    b.add(x - 0.5, stats.lower_whisker);
                    b.add(x + 0.5, stats.upper_whisker);
                    for &o in &stats.outliers {
                        b.add(x, o);
                    }
                }
                Geometry::Heatmap(_) => return None,
            }
        }
        b.finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub color: Rgb,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Connected `[x, y]` points.
    Line(Vec<[f64; 2]>),
    /// Unconnected `[x, y]` points.
    Markers(Vec<[f64; 2]>),
    /// `[category, height]` bars.
    Bars(Vec<[f64; 2]>),
    Histogram(Vec<HistogramBin>),
    Box(BoxStats),
    Heatmap(CorrelationMatrix),
}

/// Square matrix of pairwise correlations; `values[row][col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }
}

#[derive(Default)]
struct Bounds {
    x: Option<(f64, f64)>,
    y: Option<(f64, f64)>,
}

impl Bounds {
    fn add(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let grow = |r: Option<(f64, f64)>, v: f64| Some(r.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))));
        self.x = grow(self.x, x);
        self.y = grow(self.y, y);
    }

    fn finish(self) -> Option<(f64, f64, f64, f64)> {
        let widen = |r: Option<(f64, f64)>| match r {
            Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 1.0, hi + 1.0),
            Some(r) => r,
            None => (0.0, 1.0),
        };
        let (x0, x1) = widen(self.x);
        let (y0, y1) = widen(self.y);
        Some((x0, x1, y0, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_at_integral_positions() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(label_at(&labels, 1.0), "b");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, -1.0), "");
        assert_eq!(label_at(&labels, 2.0), "");
    }
}
