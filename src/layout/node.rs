use crate::config::{DiagramConfig, NodeConfig};
use crate::family::Person;
use crate::text_metrics;
use crate::theme::Theme;

use super::types::{FadeTransition, NodeType, Point, Size};

// Line height multiplier for the name and age text lines.
const LINE_HEIGHT: f32 = 1.4;

/// One displayed person: owns its snapshot of the person record, the
/// node-local geometry and the year-filter state machine.
#[derive(Debug, Clone)]
pub struct DiagramNode {
    pub person: Person,
    pub node_type: NodeType,
    pub scale: f32,
    /// Top-left corner, relative to the owning group.
    pub location: Point,
    /// Measured (unscaled) size.
    pub size: Size,
    pub display_year: i32,
    pub is_filtered: bool,
    /// Steady-state opacity after any pending transition completes.
    pub opacity: f32,
    pub age_text: String,
    pub show_group_indicator: bool,
    pending_fade: Option<FadeTransition>,
}

impl DiagramNode {
    pub fn new(
        person: Person,
        node_type: NodeType,
        scale: f32,
        display_year: i32,
        config: &DiagramConfig,
    ) -> Self {
        let is_filtered = filtered_at(&person, display_year);
        let opacity = if is_filtered {
            config.opacity_filtered
        } else {
            config.opacity_normal
        };
        let age_text = age_text(&person, display_year);
        let show_group_indicator = group_indicator(&person, node_type);
        Self {
            person,
            node_type,
            scale,
            location: Point::default(),
            size: Size::default(),
            display_year,
            is_filtered,
            opacity,
            age_text,
            show_group_indicator,
            pending_fade: None,
        }
    }

    /// Measure the node box from its two text lines.
    pub fn measure(&mut self, theme: &Theme, config: &NodeConfig) {
        let name_width =
            text_metrics::measure_label_width(&self.person.name, theme.font_size, &theme.font_family);
        let age_size = theme.font_size * config.age_font_scale;
        let age_width =
            text_metrics::measure_label_width(&self.age_text, age_size, &theme.font_family);
        let width = (name_width.max(age_width) + config.padding_x * 2.0).max(config.min_width);
        let height = theme.font_size * LINE_HEIGHT + age_size * LINE_HEIGHT + config.padding_y * 2.0;
        self.size = Size::new(width, height);
    }

    /// Update the filter state for a new display year. A filtered-state
    /// change records a fade request; an unchanged state leaves any pending
    /// request untouched, so repeated calls with the same year are inert.
    pub fn set_display_year(&mut self, year: i32, config: &DiagramConfig) {
        self.display_year = year;
        self.age_text = age_text(&self.person, year);

        let filtered = filtered_at(&self.person, year);
        if filtered == self.is_filtered {
            return;
        }
        self.is_filtered = filtered;
        let target = if filtered {
            config.opacity_filtered
        } else {
            config.opacity_normal
        };
        self.pending_fade = Some(FadeTransition {
            from: self.opacity,
            to: target,
            delay_ms: 0.0,
            duration_ms: config.filter_fade_ms,
        });
        self.opacity = target;
    }

    /// Replace any pending transition, used by the repopulate sequence.
    pub fn request_fade(&mut self, fade: FadeTransition) {
        self.opacity = fade.to;
        self.pending_fade = Some(fade);
    }

    pub fn pending_fade(&self) -> Option<FadeTransition> {
        self.pending_fade
    }

    /// Hand the pending transition to the presentation layer.
    pub fn take_pending_fade(&mut self) -> Option<FadeTransition> {
        self.pending_fade.take()
    }

    pub fn scaled_size(&self) -> Size {
        Size::new(self.size.width * self.scale, self.size.height * self.scale)
    }

    // Anchor points, relative to the owning group.

    pub fn center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(
            self.location.x + size.width / 2.0,
            self.location.y + size.height / 2.0,
        )
    }

    pub fn top_center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(self.location.x + size.width / 2.0, self.location.y)
    }

    pub fn bottom_center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(
            self.location.x + size.width / 2.0,
            self.location.y + size.height,
        )
    }

    pub fn left_center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(self.location.x, self.location.y + size.height / 2.0)
    }

    pub fn right_center(&self) -> Point {
        let size = self.scaled_size();
        Point::new(
            self.location.x + size.width,
            self.location.y + size.height / 2.0,
        )
    }

    pub fn top_right(&self) -> Point {
        let size = self.scaled_size();
        Point::new(self.location.x + size.width, self.location.y)
    }
}

fn filtered_at(person: &Person, year: i32) -> bool {
    match person.birth_year() {
        Some(birth) => birth > year,
        None => false,
    }
}

fn age_text(person: &Person, year: i32) -> String {
    match person.age_at(year) {
        Some(age) => age.to_string(),
        None => "?".to_string(),
    }
}

/// Marker for people whose wider family is not expanded in the diagram:
/// spouses that have their own parents, siblings or prior spouses, and
/// siblings that have a spouse or children of their own.
fn group_indicator(person: &Person, node_type: NodeType) -> bool {
    match node_type {
        NodeType::Spouse => {
            !person.parents.is_empty() || !person.siblings.is_empty()
                || !person.previous_spouses.is_empty()
        }
        NodeType::Sibling | NodeType::SiblingLeft | NodeType::SiblingRight => {
            person.has_spouse() || !person.children.is_empty()
        }
        NodeType::Primary | NodeType::Related => false,
    }
}
