use std::collections::HashSet;
use std::io::Write;

use placement_data::Tables;
use serde::Deserialize;

use crate::attr::{application_edges, edge_thicknesses, node_colours};
use crate::position::{GridPosition, Layout};

pub const HW_EDGE_COLOUR: &str = "#000000";
pub const APP_EDGE_COLOUR: &str = "#ff0000";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Also draw the loaded hardware edges, thicker the more loaded.
    pub draw_hw_edges: bool,
    /// Load at which a mailbox is drawn fully opaque. Defaults to the
    /// heaviest mailbox load.
    pub max_node_load: Option<f64>,
    /// Load at which a hardware edge is drawn at full thickness. Defaults
    /// to the heaviest edge load.
    pub max_edge_load: Option<f64>,
    pub base_colour: String,
    /// Graphviz layout engine.
    pub engine: String,
    /// Leave the Graphviz source next to the rendered map.
    pub keep_source: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            draw_hw_edges: false,
            max_node_load: None,
            max_edge_load: None,
            base_colour: "#4444ff".into(),
            engine: "neato".into(),
            keep_source: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapNode {
    pub name: String,
    pub fill: String,
    pub pos: Option<GridPosition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapEdge {
    pub from: String,
    pub to: String,
    pub colour: &'static str,
    pub penwidth: Option<f64>,
}

/// A declarative map of a placement run, ready for Graphviz.
#[derive(Clone, Debug)]
pub struct MapGraph {
    pub name: String,
    /// Keep only the first edge between any two nodes.
    pub strict: bool,
    pub engine: String,
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
}

impl MapGraph {
    pub fn build(tables: &Tables, opts: &MapOptions, layout: &Layout) -> MapGraph {
        let mailboxes = &tables.mailbox_loading;
        let positions = layout.positions(mailboxes.iter().map(|n| n.node.as_str()));
        let nodes = node_colours(mailboxes, opts.max_node_load, &opts.base_colour)
            .into_iter()
            .map(|(name, fill)| {
                let pos = positions
                    .as_ref()
                    .and_then(|p| p.get(name.as_str()).copied());
                MapNode { name, fill, pos }
            })
            .collect();

        // hardware edges go first, so that a strict graph keeps them over
        // application edges between the same nodes
        let mut edges = vec![];
        if opts.draw_hw_edges {
            for ((from, to), thickness) in
                edge_thicknesses(&tables.hw_edge_loading, opts.max_edge_load)
            {
                edges.push(MapEdge {
                    from,
                    to,
                    colour: HW_EDGE_COLOUR,
                    penwidth: Some(thickness),
                });
            }
        }
        for (from, to) in application_edges(&tables.app_edge_costs, &tables.app_to_hw) {
            edges.push(MapEdge {
                from,
                to,
                colour: APP_EDGE_COLOUR,
                penwidth: None,
            });
        }

        MapGraph {
            name: "G".into(),
            strict: true,
            engine: opts.engine.clone(),
            nodes,
            edges,
        }
    }

    pub fn has_positions(&self) -> bool {
        self.nodes.iter().all(|n| n.pos.is_some())
    }

    /// The edges a renderer draws: in a strict graph, only the first edge
    /// between each unordered pair of nodes.
    pub fn drawn_edges(&self) -> Vec<&MapEdge> {
        if !self.strict {
            return self.edges.iter().collect();
        }
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter(|e| {
                let key = if e.from <= e.to {
                    (e.from.as_str(), e.to.as_str())
                } else {
                    (e.to.as_str(), e.from.as_str())
                };
                seen.insert(key)
            })
            .collect()
    }

    pub fn emit_dot(&self, mut f: impl Write) -> Result<(), std::io::Error> {
        let strict = if self.strict { "strict " } else { "" };
        writeln!(f, "{strict}graph \"{n}\" {{", n = escape(&self.name))?;
        writeln!(f, "\tgraph [margin=0]")?;
        writeln!(
            f,
            "\tnode [fillcolor=\"#000000\" label=\"\" margin=0 shape=square style=filled]"
        )?;
        for node in &self.nodes {
            write!(
                f,
                "\t\"{n}\" [fillcolor=\"{c}\"",
                n = escape(&node.name),
                c = node.fill
            )?;
            if let Some(pos) = node.pos {
                write!(f, " pos=\"{x},{y}!\"", x = pos.x, y = pos.y)?;
            }
            writeln!(f, "]")?;
        }
        for edge in self.drawn_edges() {
            write!(
                f,
                "\t\"{a}\" -- \"{b}\" [color=\"{c}\"",
                a = escape(&edge.from),
                b = escape(&edge.to),
                c = edge.colour
            )?;
            if let Some(w) = edge.penwidth {
                write!(f, " penwidth={w}")?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
