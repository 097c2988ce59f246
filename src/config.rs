use crate::theme::Theme;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Diagram-wide layout constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Stop adding new rows once the diagram would exceed this many nodes.
    pub maximum_nodes: usize,
    /// Space between nodes within a group.
    pub node_space: f32,
    /// Space between rows.
    pub row_space: f32,
    pub primary_row_group_space: f32,
    pub child_row_group_space: f32,
    pub parent_row_group_space: f32,
    /// Scale multiplier for spouse and sibling nodes.
    pub related_multiplier: f32,
    /// Scale multiplier compounding per generation away from the primary row.
    pub generation_multiplier: f32,
    pub opacity_normal: f32,
    pub opacity_filtered: f32,
    /// Duration of the filtered-state opacity transition.
    pub filter_fade_ms: f32,
    /// Pause before new nodes fade in after a repopulate.
    pub populate_pause_ms: f32,
    /// Duration of the repopulate fade-in.
    pub node_fade_in_ms: f32,
    /// Extra fade-in delay per row during a repopulate.
    pub row_fade_stagger_ms: f32,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            maximum_nodes: 50,
            node_space: 10.0,
            row_space: 40.0,
            primary_row_group_space: 20.0,
            child_row_group_space: 20.0,
            parent_row_group_space: 40.0,
            related_multiplier: 0.8,
            generation_multiplier: 0.9,
            opacity_normal: 1.0,
            opacity_filtered: 0.15,
            filter_fade_ms: 300.0,
            populate_pause_ms: 600.0,
            node_fade_in_ms: 500.0,
            row_fade_stagger_ms: 100.0,
        }
    }
}

/// Sizing of a single person node box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub padding_x: f32,
    pub padding_y: f32,
    pub min_width: f32,
    pub corner_radius: f32,
    /// Age line font size relative to the name line.
    pub age_font_scale: f32,
    pub group_indicator_radius: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            padding_x: 12.0,
            padding_y: 8.0,
            min_width: 70.0,
            corner_radius: 8.0,
            age_font_scale: 0.8,
            group_indicator_radius: 3.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub diagram: DiagramConfig,
    pub node: NodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: 24.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Load a config JSON file. Absent fields fall back to defaults, so a file
/// may override just the theme or a single constant.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
