use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};
use which::which;

use crate::graph::MapGraph;

#[derive(Debug)]
pub enum RenderError {
    NoFormat(PathBuf),
    GraphvizMissing(which::Error),
    GraphvizFailed { status: String, stderr: String },
    IoError(std::io::Error),
}

impl From<std::io::Error> for RenderError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::NoFormat(path) => write!(
                f,
                "cannot tell output format of '{}' without an extension",
                path.display()
            ),
            RenderError::GraphvizMissing(error) => write!(f, "graphviz not found: {error}"),
            RenderError::GraphvizFailed { status, stderr } => {
                write!(f, "graphviz failed ({status}): {stderr}")
            }
            RenderError::IoError(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Something that turns a map into an image file.
pub trait Renderer {
    /// Writes `graph` to `out`, in the format given by its extension.
    fn render(&self, graph: &MapGraph, out: &Path) -> Result<(), RenderError>;
}

#[derive(Clone, Debug)]
pub struct GraphvizRenderer {
    /// Keep the Graphviz source file (see [`GraphvizRenderer::source_path`])
    /// after rendering.
    pub keep_source: bool,
}

impl GraphvizRenderer {
    pub fn new(keep_source: bool) -> Self {
        GraphvizRenderer { keep_source }
    }

    /// Where the Graphviz source for `out` is written: `out` without its
    /// extension, so that it never collides with the rendered file.
    pub fn source_path(out: &Path) -> PathBuf {
        if out.extension().is_some() {
            out.with_extension("")
        } else {
            out.with_extension("gv")
        }
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &MapGraph, out: &Path) -> Result<(), RenderError> {
        let Some(format) = out.extension().and_then(|ext| ext.to_str()) else {
            Err(RenderError::NoFormat(out.to_path_buf()))?
        };
        let dot = which("dot").map_err(RenderError::GraphvizMissing)?;
        let src = Self::source_path(out);
        let mut f = BufWriter::new(File::create(&src)?);
        graph.emit_dot(&mut f)?;
        f.flush()?;
        drop(f);
        debug!("wrote graphviz source to {}", src.display());

        let output = Command::new(dot)
            .arg(format!("-K{e}", e = graph.engine))
            .arg(format!("-T{format}"))
            .arg(&src)
            .arg("-o")
            .arg(out)
            .output();
        if !self.keep_source {
            // Nothing much to do if it fails.
            let _ = std::fs::remove_file(&src);
        }
        let output = output?;
        if !output.status.success() {
            Err(RenderError::GraphvizFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })?
        }
        info!("rendered map to {}", out.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    fn empty_graph() -> MapGraph {
        MapGraph {
            name: "G".into(),
            strict: true,
            engine: "neato".into(),
            nodes: vec![],
            edges: vec![],
        }
    }

    #[test]
    fn test_no_format() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("map");
        assert_matches!(
            GraphvizRenderer::new(false).render(&empty_graph(), &out),
            Err(RenderError::NoFormat(_))
        );
        assert!(!GraphvizRenderer::source_path(&out).exists());
    }

    #[test]
    fn test_source_path() {
        assert_eq!(
            GraphvizRenderer::source_path(Path::new("out/map.pdf")),
            Path::new("out/map")
        );
        for out in ["map.gv", "map.dot", "out/map.svg", "map"] {
            let out = Path::new(out);
            assert_ne!(GraphvizRenderer::source_path(out), out);
        }
    }
}
