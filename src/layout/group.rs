use crate::config::NodeConfig;
use crate::theme::Theme;

use super::node::DiagramNode;
use super::types::{Point, Size};

/// A cluster of nodes laid out side by side: one nuclear family unit.
#[derive(Debug, Clone, Default)]
pub struct DiagramGroup {
    /// Top-left corner, relative to the owning row.
    pub location: Point,
    pub size: Size,
    nodes: Vec<DiagramNode>,
}

impl DiagramGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: DiagramNode) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [DiagramNode] {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Measure pass: size each node, then report the group extent without
    /// moving anything.
    pub fn measure(&mut self, theme: &Theme, config: &NodeConfig, node_space: f32) -> Size {
        for node in &mut self.nodes {
            node.measure(theme, config);
        }
        self.size = self.place_nodes(false, node_space);
        self.size
    }

    /// Arrange pass: write each node's location. Total size matches the
    /// measure pass, and re-running is side-effect free beyond locations.
    pub fn arrange(&mut self, node_space: f32) {
        self.size = self.place_nodes(true, node_space);
    }

    // Nodes flow left to right with fixed spacing and sit on a common
    // bottom baseline, so scaled-down spouses align with their partner.
    fn place_nodes(&mut self, position: bool, node_space: f32) -> Size {
        let mut height = 0.0f32;
        for node in &self.nodes {
            height = height.max(node.scaled_size().height);
        }

        let mut x = 0.0f32;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if index > 0 {
                x += node_space;
            }
            let scaled = node.scaled_size();
            if position {
                node.location = Point::new(x, height - scaled.height);
            }
            x += scaled.width;
        }
        Size::new(x, height)
    }
}
