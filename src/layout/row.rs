use crate::config::NodeConfig;
use crate::theme::Theme;

use super::group::DiagramGroup;
use super::types::{Point, Size};

/// One generation of the diagram: an ordered run of groups.
#[derive(Debug, Clone, Default)]
pub struct DiagramRow {
    /// Top-left corner, relative to the diagram.
    pub location: Point,
    pub size: Size,
    /// Space between groups; ancestor rows use a wider gap.
    pub group_space: f32,
    groups: Vec<DiagramGroup>,
}

impl DiagramRow {
    pub fn new(group_space: f32) -> Self {
        Self {
            group_space,
            ..Self::default()
        }
    }

    pub fn add_group(&mut self, group: DiagramGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[DiagramGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [DiagramGroup] {
        &mut self.groups
    }

    pub fn node_count(&self) -> usize {
        self.groups.iter().map(DiagramGroup::node_count).sum()
    }

    pub fn measure(&mut self, theme: &Theme, config: &NodeConfig, node_space: f32) -> Size {
        for group in &mut self.groups {
            group.measure(theme, config, node_space);
        }
        self.size = self.place_groups(false);
        self.size
    }

    pub fn arrange(&mut self, node_space: f32) {
        // Refresh group extents first so placement sees current sizes.
        for group in &mut self.groups {
            group.arrange(node_space);
        }
        self.size = self.place_groups(true);
    }

    fn place_groups(&mut self, position: bool) -> Size {
        let mut height = 0.0f32;
        for group in &self.groups {
            height = height.max(group.size.height);
        }

        let mut x = 0.0f32;
        for (index, group) in self.groups.iter_mut().enumerate() {
            if index > 0 {
                x += self.group_space;
            }
            if position {
                group.location = Point::new(x, height - group.size.height);
            }
            x += group.size.width;
        }
        Size::new(x, height)
    }
}
