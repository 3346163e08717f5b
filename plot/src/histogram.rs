use placement_data::Tables;
use serde::Deserialize;

/// Added to the upper limit when all values are equal, so that the axis
/// has some width.
pub const DEGENERATE_NUDGE: f64 = 1e-2;

#[derive(Debug, PartialEq, Eq)]
pub enum PlotError {
    NoValues,
    NoBins,
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::NoValues => write!(f, "nothing to plot"),
            PlotError::NoBins => write!(f, "histogram needs at least one bin"),
        }
    }
}

impl std::error::Error for PlotError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HistogramKind {
    MailboxLoading,
    CoreLoading,
    EdgeLoading,
    AppEdgeCost,
}

impl HistogramKind {
    pub fn values(self, t: &Tables) -> Vec<f64> {
        match self {
            HistogramKind::MailboxLoading => {
                t.mailbox_loading.iter().map(|n| n.load as f64).collect()
            }
            HistogramKind::CoreLoading => t.core_loading.iter().map(|n| n.load as f64).collect(),
            HistogramKind::EdgeLoading => {
                t.hw_edge_loading.iter().map(|e| e.load as f64).collect()
            }
            HistogramKind::AppEdgeCost => t.app_edge_costs.iter().map(|e| e.cost).collect(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HistogramKind::MailboxLoading => "Mailbox Loading",
            HistogramKind::CoreLoading => "Core Loading",
            HistogramKind::EdgeLoading => "Mailbox Edge Loading",
            HistogramKind::AppEdgeCost => "Application Edge Costs",
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            HistogramKind::MailboxLoading => "Number of application nodes placed on mailboxes",
            HistogramKind::CoreLoading => "Number of application nodes placed on cores",
            HistogramKind::EdgeLoading => "Number of application edges routed over mailbox edges",
            HistogramKind::AppEdgeCost => "Cost of application edge",
        }
    }

    /// Whether the values are counts, so axis ticks should be integers.
    pub fn is_integral(self) -> bool {
        !matches!(self, HistogramKind::AppEdgeCost)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HistogramOptions {
    pub bins: usize,
    pub fill: String,
    pub edge_colour: String,
    /// Figure size, in inches.
    pub width_in: f64,
    pub height_in: f64,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        HistogramOptions {
            bins: 6,
            fill: "#ff0000".into(),
            edge_colour: "#550000".into(),
            width_in: 4.,
            height_in: 3.,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Result<Histogram, PlotError> {
        if bins == 0 {
            Err(PlotError::NoBins)?
        }
        if values.is_empty() {
            Err(PlotError::NoValues)?
        }
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            hi += DEGENERATE_NUDGE;
        }
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();
        let mut counts = vec![0; bins];
        for &v in values {
            // bins are half-open, except the last
            let idx = edges[1..].partition_point(|&e| e <= v).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Histogram {
            edges,
            counts,
            x_range: (lo, hi),
            y_range: (0., values.len() as f64),
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins() {
        let hist = Histogram::new(&[0., 1., 2., 3., 4., 5., 6.], 3).unwrap();
        assert_eq!(hist.edges, [0., 2., 4., 6.]);
        assert_eq!(hist.counts, [2, 2, 3]);
        assert_eq!(hist.x_range, (0., 6.));
        assert_eq!(hist.y_range, (0., 7.));
        assert_eq!(hist.total(), 7);
    }

    #[test]
    fn test_degenerate() {
        let hist = Histogram::new(&[3., 3., 3.], 6).unwrap();
        assert!(hist.x_range.1 > hist.x_range.0);
        assert_eq!(hist.x_range, (3., 3. + DEGENERATE_NUDGE));
        assert_eq!(hist.counts[0], 3);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Histogram::new(&[], 6), Err(PlotError::NoValues));
        assert_eq!(Histogram::new(&[1.], 0), Err(PlotError::NoBins));
    }

    #[test]
    fn test_values() {
        let tables = Tables {
            core_loading: vec![placement_data::NodeLoad {
                node: "core".into(),
                load: 3,
            }],
            app_edge_costs: vec![placement_data::AppEdgeCost {
                from: "a".into(),
                to: "b".into(),
                cost: 0.5,
            }],
            ..Tables::default()
        };
        assert_eq!(HistogramKind::CoreLoading.values(&tables), [3.]);
        assert_eq!(HistogramKind::AppEdgeCost.values(&tables), [0.5]);
        assert!(HistogramKind::MailboxLoading.values(&tables).is_empty());
    }

    #[test]
    fn test_defaults() {
        let opts = HistogramOptions::default();
        assert_eq!(opts.bins, 6);
        assert_eq!(opts.edge_colour, "#550000");
    }
}
