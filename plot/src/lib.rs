//! Load and cost histograms of a placement run, drawn as SVG.

pub mod histogram;
pub mod svg;

pub use histogram::{Histogram, HistogramKind, HistogramOptions, PlotError};
pub use svg::HistogramFigure;
