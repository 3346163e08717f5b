use std::fs::read_to_string;
use std::path::Path;

use placement_map::{Layout, MapOptions};
use placement_plot::HistogramOptions;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map: MapOptions,
    pub layout: Layout,
    pub histogram: HistogramOptions,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let s = read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let config: Config = toml::from_str(
            r##"
            [map]
            draw_hw_edges = true
            max_node_load = 8
            engine = "fdp"

            [layout]
            board_spacing = 5

            [layout.boxes]
            Solo = [2, 1]

            [histogram]
            bins = 10
            fill = "#00ff00"
            "##,
        )
        .unwrap();
        assert!(config.map.draw_hw_edges);
        assert_eq!(config.map.max_node_load, Some(8.));
        assert_eq!(config.map.engine, "fdp");
        assert_eq!(config.map.base_colour, "#4444ff");
        assert_eq!(config.layout.board_spacing, 5);
        assert_eq!(config.layout.box_spacing_x, 3);
        assert_eq!(config.layout.boxes.len(), 1);
        assert_eq!(config.layout.boxes["Solo"], (2, 1));
        assert_eq!(config.histogram.bins, 10);
        assert_eq!(config.histogram.edge_colour, "#550000");
    }

    #[test]
    fn test_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.map.draw_hw_edges);
        assert_eq!(config.layout.boxes.len(), 10);
        assert_eq!(config.histogram.bins, 6);
    }

    #[test]
    fn test_unknown_section() {
        assert!(toml::from_str::<Config>("[plot]\nbins = 3\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("placement.toml");
        std::fs::write(&path, "[map]\nkeep_source = true\n").unwrap();
        assert!(Config::from_file(&path).unwrap().map.keep_source);
        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }
}
