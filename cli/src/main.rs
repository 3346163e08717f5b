use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use placement_data::{PlacementDataset, Tables};
use placement_map::{GraphvizRenderer, MapGraph, Renderer};
use placement_plot::{Histogram, HistogramFigure, HistogramKind};
use simple_error::bail;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "placement", about = "Inspect the output of a placement run")]
struct Args {
    /// TOML file with [map], [layout] and [histogram] settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the files of one placement run.
    dir: PathBuf,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Print the run identity, the detected files and table sizes.
    Summary,
    /// Draw the mailboxes and edges of the run with Graphviz.
    Map {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        draw_hw_edges: bool,
        #[arg(long)]
        keep_source: bool,
        #[arg(long)]
        max_node_load: Option<f64>,
        #[arg(long)]
        max_edge_load: Option<f64>,
        #[arg(long)]
        engine: Option<String>,
    },
    /// Plot a histogram of loads or costs as SVG.
    Histogram {
        #[arg(long)]
        kind: HistKind,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        bins: Option<usize>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum HistKind {
    Mailbox,
    Core,
    Edge,
    AppEdgeCost,
}

impl From<HistKind> for HistogramKind {
    fn from(kind: HistKind) -> Self {
        match kind {
            HistKind::Mailbox => HistogramKind::MailboxLoading,
            HistKind::Core => HistogramKind::CoreLoading,
            HistKind::Edge => HistogramKind::EdgeLoading,
            HistKind::AppEdgeCost => HistogramKind::AppEdgeCost,
        }
    }
}

fn summary(data: &PlacementDataset) {
    println!("directory: {}", data.dir().display());
    if let Some(ref appname) = data.run().appname {
        println!("application: {appname}");
    }
    println!("timestamp: {}", data.run().timestamp);
    for (kind, fname) in data.files().iter() {
        println!("{kind}: {fname}");
    }
    let t = data.tables();
    for (name, rows) in [
        ("application edges", t.app_edge_costs.len()),
        ("application nodes mapped", t.app_to_hw.len()),
        ("hardware edges", t.hw_edge_loading.len()),
        ("hardware nodes mapped", t.hw_to_app.len()),
        ("cores", t.core_loading.len()),
        ("mailboxes", t.mailbox_loading.len()),
    ] {
        println!("{name}: {rows}");
    }
}

fn histogram(
    tables: &Tables,
    config: &Config,
    kind: HistogramKind,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    if out.extension().is_none_or(|ext| ext != "svg") {
        bail!("histograms are written as SVG, not '{}'", out.display());
    }
    let values = kind.values(tables);
    if values.is_empty() {
        bail!("no values for {t} in this run", t = kind.title());
    }
    let hist = Histogram::new(&values, config.histogram.bins)?;
    let mut f = BufWriter::new(File::create(out)?);
    HistogramFigure {
        hist: &hist,
        kind,
        opts: &config.histogram,
    }
    .emit(&mut f)?;
    f.flush()?;
    info!("wrote {t} histogram to {o}", t = kind.title(), o = out.display());
    Ok(())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match args.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let data = PlacementDataset::open(&args.dir)?;
    match args.command {
        Cmd::Summary => summary(&data),
        Cmd::Map {
            out,
            draw_hw_edges,
            keep_source,
            max_node_load,
            max_edge_load,
            engine,
        } => {
            let opts = &mut config.map;
            opts.draw_hw_edges |= draw_hw_edges;
            opts.keep_source |= keep_source;
            if max_node_load.is_some() {
                opts.max_node_load = max_node_load;
            }
            if max_edge_load.is_some() {
                opts.max_edge_load = max_edge_load;
            }
            if let Some(engine) = engine {
                opts.engine = engine;
            }
            let graph = MapGraph::build(data.tables(), opts, &config.layout);
            GraphvizRenderer::new(opts.keep_source).render(&graph, &out)?;
        }
        Cmd::Histogram { kind, out, bins } => {
            if let Some(bins) = bins {
                config.histogram.bins = bins;
            }
            histogram(data.tables(), &config, kind.into(), &out)?;
        }
    }
    Ok(())
}
