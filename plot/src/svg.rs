use std::io::Write;

use crate::histogram::{Histogram, HistogramKind, HistogramOptions};

const PX_PER_IN: f64 = 100.;
const MARGIN_L: f64 = 56.;
const MARGIN_R: f64 = 16.;
const MARGIN_T: f64 = 28.;
const MARGIN_B: f64 = 44.;
const TICK: f64 = 4.;
const MAX_TICKS: f64 = 8.;

/// Tick positions within `[lo, hi]`, at round steps.
fn ticks(lo: f64, hi: f64, integral: bool) -> Vec<f64> {
    let span = hi - lo;
    if !(span > 0.) {
        return vec![lo];
    }
    let raw = span / MAX_TICKS;
    let mag = 10f64.powf(raw.log10().floor());
    let mut step = [1., 2., 5., 10.]
        .into_iter()
        .map(|m| m * mag)
        .find(|&s| s >= raw)
        .unwrap_or(10. * mag);
    if integral {
        step = step.max(1.).round();
    }
    let mut res = vec![];
    let mut t = (lo / step).ceil() * step;
    while t <= hi + step * 1e-9 {
        res.push(t);
        t += step;
    }
    res
}

fn fmt_tick(t: f64) -> String {
    if t.fract() == 0. {
        format!("{t:.0}")
    } else {
        format!("{t:.2}")
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A histogram figure, drawn as a standalone SVG document.
pub struct HistogramFigure<'a> {
    pub hist: &'a Histogram,
    pub kind: HistogramKind,
    pub opts: &'a HistogramOptions,
}

impl HistogramFigure<'_> {
    pub fn emit(&self, mut f: impl Write) -> Result<(), std::io::Error> {
        let width = self.opts.width_in * PX_PER_IN;
        let height = self.opts.height_in * PX_PER_IN;
        let plot_w = (width - MARGIN_L - MARGIN_R).max(1.);
        let plot_h = (height - MARGIN_T - MARGIN_B).max(1.);
        let (x_lo, x_hi) = self.hist.x_range;
        let (y_lo, y_hi) = self.hist.y_range;
        let sx = |x: f64| MARGIN_L + (x - x_lo) / (x_hi - x_lo) * plot_w;
        let sy = |y: f64| MARGIN_T + plot_h - (y - y_lo) / (y_hi - y_lo) * plot_h;

        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" font-family=\"sans-serif\" font-size=\"11\">"
        )?;
        writeln!(
            f,
            "<text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"13\">{t}</text>",
            x = MARGIN_L + plot_w / 2.,
            y = MARGIN_T / 2. + 5.,
            t = escape(self.kind.title())
        )?;
        for (i, &count) in self.hist.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let xl = sx(self.hist.edges[i]);
            let xr = sx(self.hist.edges[i + 1]);
            let yt = sy(count as f64);
            writeln!(
                f,
                "<rect x=\"{xl}\" y=\"{yt}\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\" stroke=\"{stroke}\"/>",
                w = xr - xl,
                h = sy(0.) - yt,
                fill = self.opts.fill,
                stroke = self.opts.edge_colour
            )?;
        }

        // left and bottom spines only
        let (x0, y0) = (MARGIN_L, MARGIN_T + plot_h);
        writeln!(
            f,
            "<path d=\"M{x0} {MARGIN_T} V{y0} H{x1}\" fill=\"none\" stroke=\"black\"/>",
            x1 = MARGIN_L + plot_w
        )?;
        for t in ticks(x_lo, x_hi, self.kind.is_integral()) {
            let x = sx(t);
            writeln!(
                f,
                "<line x1=\"{x}\" y1=\"{y0}\" x2=\"{x}\" y2=\"{y1}\" stroke=\"black\"/>",
                y1 = y0 + TICK
            )?;
            writeln!(
                f,
                "<text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\">{l}</text>",
                y = y0 + TICK + 11.,
                l = fmt_tick(t)
            )?;
        }
        for t in ticks(y_lo, y_hi, true) {
            let y = sy(t);
            writeln!(
                f,
                "<line x1=\"{x1}\" y1=\"{y}\" x2=\"{x0}\" y2=\"{y}\" stroke=\"black\"/>",
                x1 = x0 - TICK
            )?;
            writeln!(
                f,
                "<text x=\"{x}\" y=\"{y}\" text-anchor=\"end\" dominant-baseline=\"middle\">{l}</text>",
                x = x0 - TICK - 2.,
                l = fmt_tick(t)
            )?;
        }
        writeln!(
            f,
            "<text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\">{l}</text>",
            x = MARGIN_L + plot_w / 2.,
            y = height - 6.,
            l = escape(self.kind.x_label())
        )?;
        writeln!(
            f,
            "<text transform=\"translate(12 {y}) rotate(-90)\" text-anchor=\"middle\">Occurrences (total={n})</text>",
            y = MARGIN_T + plot_h / 2.,
            n = self.hist.total()
        )?;
        writeln!(f, "</svg>")?;
        Ok(())
    }
}
