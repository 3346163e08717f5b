use std::collections::HashMap;

use indexmap::IndexMap;
use placement_data::{AppEdgeCost, AppToHw, EdgeLoad, NodeLoad};
use tracing::warn;

pub const THICKNESS_MAX: f64 = 5.;

/// The divisor to scale loads by, or `None` if the loads give no range to
/// scale over.
fn scale_max(loads: impl Iterator<Item = u64> + Clone, max: Option<f64>) -> Option<f64> {
    let max = match max {
        Some(max) => max,
        None => {
            let hi = loads.clone().max()?;
            let lo = loads.min()?;
            if lo == hi {
                return None;
            }
            hi as f64
        }
    };
    (max > 0. && max.is_finite()).then_some(max)
}

/// Alpha channel for a node loaded with `load`, out of `max`.
pub fn intensity(load: u64, max: Option<f64>) -> u8 {
    match max {
        Some(max) => (load as f64 / max * 255.).round().clamp(0., 255.) as u8,
        None => 0,
    }
}

pub fn thickness(load: u64, max: Option<f64>) -> f64 {
    match max {
        Some(max) => (load as f64 / max * THICKNESS_MAX).min(THICKNESS_MAX),
        None => 0.,
    }
}

/// Fill colour of every mailbox: `base` with an alpha channel proportional
/// to its load. Loads at or above `max` (default: the largest load) are
/// fully opaque.
pub fn node_colours(
    mailboxes: &[NodeLoad],
    max: Option<f64>,
    base: &str,
) -> IndexMap<String, String> {
    let max = scale_max(mailboxes.iter().map(|n| n.load), max);
    mailboxes
        .iter()
        .map(|n| {
            let alpha = intensity(n.load, max);
            (n.node.clone(), format!("{base}{alpha:02x}"))
        })
        .collect()
}

pub fn edge_thicknesses(
    edges: &[EdgeLoad],
    max: Option<f64>,
) -> IndexMap<(String, String), f64> {
    let max = scale_max(edges.iter().map(|e| e.load), max);
    edges
        .iter()
        .map(|e| ((e.from.clone(), e.to.clone()), thickness(e.load, max)))
        .collect()
}

/// Strips the board and mailbox components off a hardware node name.
pub fn box_of(hwnode: &str) -> &str {
    match hwnode.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &hwnode[..idx],
        None => "",
    }
}

/// Application edges that cross between boxes, as pairs of box names.
///
/// Edges within a box are assumed to overlay the hardware edges and are not
/// returned. The same pair may appear more than once.
pub fn application_edges(edges: &[AppEdgeCost], app_to_hw: &[AppToHw]) -> Vec<(String, String)> {
    // first mapping of an application node wins
    let mut hw: HashMap<&str, &str> = HashMap::new();
    for m in app_to_hw {
        hw.entry(m.appnode.as_str()).or_insert(m.hwnode.as_str());
    }
    let mut res = vec![];
    for edge in edges {
        let (Some(from), Some(to)) = (hw.get(edge.from.as_str()), hw.get(edge.to.as_str())) else {
            warn!(
                "application edge {} -> {} has an unmapped endpoint; skipping",
                edge.from, edge.to
            );
            continue;
        };
        let (from, to) = (box_of(from), box_of(to));
        if from != to {
            res.push((from.to_string(), to.to_string()));
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(loads: &[u64]) -> Vec<NodeLoad> {
        loads
            .iter()
            .enumerate()
            .map(|(i, &load)| NodeLoad {
                node: format!("n{i}"),
                load,
            })
            .collect()
    }

    fn edge(from: &str, to: &str, load: u64) -> EdgeLoad {
        EdgeLoad {
            from: from.into(),
            to: to.into(),
            load,
        }
    }

    #[test]
    fn test_colours() {
        let colours = node_colours(&nodes(&[0, 2, 4]), None, "#4444ff");
        assert_eq!(colours["n0"], "#4444ff00");
        assert_eq!(colours["n1"], "#4444ff80");
        assert_eq!(colours["n2"], "#4444ffff");
        let colours = node_colours(&nodes(&[1, 3]), Some(60.), "#000000");
        assert_eq!(colours["n0"], "#00000004");
    }

    #[test]
    fn test_intensity_monotonic() {
        let loads: Vec<u64> = (0..=40).collect();
        let max = scale_max(loads.iter().copied(), None);
        let levels: Vec<u8> = loads.iter().map(|&l| intensity(l, max)).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*levels.last().unwrap(), 255);
    }

    #[test]
    fn test_intensity_capped() {
        let colours = node_colours(&nodes(&[1, 10]), Some(5.), "#4444ff");
        assert_eq!(colours["n1"], "#4444ffff");
    }

    #[test]
    fn test_degenerate() {
        let colours = node_colours(&nodes(&[3, 3, 3]), None, "#4444ff");
        assert!(colours.values().all(|c| c == "#4444ff00"));
        let colours = node_colours(&nodes(&[0, 0]), None, "#4444ff");
        assert!(colours.values().all(|c| c == "#4444ff00"));
        let colours = node_colours(&nodes(&[2, 4]), Some(0.), "#4444ff");
        assert!(colours.values().all(|c| c == "#4444ff00"));
        let thick = edge_thicknesses(&[edge("a", "b", 2), edge("b", "c", 2)], None);
        assert!(thick.values().all(|&t| t == 0.));
        assert!(node_colours(&[], None, "#4444ff").is_empty());
    }

    #[test]
    fn test_thickness() {
        let edges = [edge("a", "b", 1), edge("b", "c", 4), edge("c", "d", 2)];
        let thick = edge_thicknesses(&edges, None);
        assert_eq!(thick[&("a".to_string(), "b".to_string())], 1.25);
        assert_eq!(thick[&("b".to_string(), "c".to_string())], THICKNESS_MAX);
        let thick = edge_thicknesses(&edges, Some(2.));
        assert_eq!(thick[&("a".to_string(), "b".to_string())], 2.5);
        assert_eq!(thick[&("b".to_string(), "c".to_string())], THICKNESS_MAX);
        assert_eq!(thick[&("c".to_string(), "d".to_string())], THICKNESS_MAX);
    }

    #[test]
    fn test_box_of() {
        assert_eq!(box_of("O_.eng.ext.Ay.B00.M01"), "O_.eng.ext.Ay");
        assert_eq!(box_of("a.b.c"), "a");
        assert_eq!(box_of("a.b"), "");
    }

    #[test]
    fn test_application_edges() {
        let map = |app: &str, hw: &str| AppToHw {
            appnode: app.into(),
            hwnode: hw.into(),
        };
        let cost = |from: &str, to: &str| AppEdgeCost {
            from: from.into(),
            to: to.into(),
            cost: 1.,
        };
        let app_to_hw = [
            map("a0", "O_.e.x.Ay.B00.M00"),
            map("a1", "O_.e.x.Ay.B10.M03"),
            map("a2", "O_.e.x.Co.B00.M00"),
        ];
        let edges = [
            cost("a0", "a1"),
            cost("a0", "a2"),
            cost("a2", "a1"),
            cost("a0", "ghost"),
        ];
        assert_eq!(
            application_edges(&edges, &app_to_hw),
            [
                ("O_.e.x.Ay".to_string(), "O_.e.x.Co".to_string()),
                ("O_.e.x.Co".to_string(), "O_.e.x.Ay".to_string()),
            ]
        );
    }

    #[test]
    fn test_application_edges_first_mapping() {
        let map = |app: &str, hw: &str| AppToHw {
            appnode: app.into(),
            hwnode: hw.into(),
        };
        let app_to_hw = [
            map("a0", "O_.e.x.Ay.B00.M00"),
            map("a1", "O_.e.x.Co.B00.M00"),
            map("a1", "O_.e.x.Ay.B00.M01"),
        ];
        let edges = [AppEdgeCost {
            from: "a0".into(),
            to: "a1".into(),
            cost: 1.,
        }];
        assert_eq!(
            application_edges(&edges, &app_to_hw),
            [("O_.e.x.Ay".to_string(), "O_.e.x.Co".to_string())]
        );
    }
}
