use chrono::{Datelike, NaiveDate};

use crate::config::DiagramConfig;

use super::node::DiagramNode;
use super::row::DiagramRow;
use super::types::{ConnectorEnd, FadeTransition, Point};

/// Connector flavor. Child connectors draw underneath everything else;
/// spouse connectors carry the marriage (and, for former spouses, divorce)
/// dates for their label.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorKind {
    Child,
    Spouse {
        married_date: Option<NaiveDate>,
        divorced_date: Option<NaiveDate>,
        former: bool,
    },
}

/// A line between two displayed nodes. Rebuilt wholesale on every layout
/// pass, never mutated across rebuilds.
#[derive(Debug, Clone)]
pub struct DiagramConnector {
    pub kind: ConnectorKind,
    pub start: ConnectorEnd,
    pub end: ConnectorEnd,
    pub is_filtered: bool,
    pub opacity: f32,
    pending_fade: Option<FadeTransition>,
}

impl ConnectorEnd {
    pub fn node<'a>(&self, rows: &'a [DiagramRow]) -> Option<&'a DiagramNode> {
        rows.get(self.row)?.groups().get(self.group)?.nodes().get(self.node)
    }

    /// Diagram-space offset of the owning group: row location + group
    /// location. Node anchors add their own group-relative coordinates.
    fn group_origin(&self, rows: &[DiagramRow]) -> Option<Point> {
        let row = rows.get(self.row)?;
        let group = row.groups().get(self.group)?;
        Some(row.location.offset(group.location))
    }

    pub fn center(&self, rows: &[DiagramRow]) -> Option<Point> {
        Some(self.group_origin(rows)?.offset(self.node(rows)?.center()))
    }

    pub fn top_center(&self, rows: &[DiagramRow]) -> Option<Point> {
        Some(self.group_origin(rows)?.offset(self.node(rows)?.top_center()))
    }

    pub fn bottom_center(&self, rows: &[DiagramRow]) -> Option<Point> {
        Some(self.group_origin(rows)?.offset(self.node(rows)?.bottom_center()))
    }
}

impl DiagramConnector {
    pub fn child(start: ConnectorEnd, end: ConnectorEnd, config: &DiagramConfig) -> Self {
        Self::new(ConnectorKind::Child, start, end, config)
    }

    pub fn spouse(
        start: ConnectorEnd,
        end: ConnectorEnd,
        married_date: Option<NaiveDate>,
        divorced_date: Option<NaiveDate>,
        former: bool,
        config: &DiagramConfig,
    ) -> Self {
        Self::new(
            ConnectorKind::Spouse {
                married_date,
                divorced_date,
                former,
            },
            start,
            end,
            config,
        )
    }

    fn new(kind: ConnectorKind, start: ConnectorEnd, end: ConnectorEnd, config: &DiagramConfig) -> Self {
        Self {
            kind,
            start,
            end,
            is_filtered: false,
            opacity: config.opacity_normal,
            pending_fade: None,
        }
    }

    pub fn is_child_connector(&self) -> bool {
        matches!(self.kind, ConnectorKind::Child)
    }

    pub fn married_year(&self) -> Option<i32> {
        match &self.kind {
            ConnectorKind::Spouse { married_date, .. } => married_date.map(|d| d.year()),
            ConnectorKind::Child => None,
        }
    }

    pub fn divorced_year(&self) -> Option<i32> {
        match &self.kind {
            ConnectorKind::Spouse { divorced_date, .. } => divorced_date.map(|d| d.year()),
            ConnectorKind::Child => None,
        }
    }

    /// Line endpoints in diagram space. Child connectors run from the
    /// parent's bottom edge to the child's top edge; spouse connectors run
    /// center to center behind the couple.
    pub fn endpoints(&self, rows: &[DiagramRow]) -> Option<(Point, Point)> {
        match self.kind {
            ConnectorKind::Child => Some((
                self.start.bottom_center(rows)?,
                self.end.top_center(rows)?,
            )),
            ConnectorKind::Spouse { .. } => {
                Some((self.start.center(rows)?, self.end.center(rows)?))
            }
        }
    }

    /// Same state machine as the node filter: a change records a fade
    /// request, an unchanged state is inert.
    pub fn set_filtered(&mut self, filtered: bool, config: &DiagramConfig) {
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

    pub fn request_fade(&mut self, fade: FadeTransition) {
        self.opacity = fade.to;
        self.pending_fade = Some(fade);
    }

    pub fn pending_fade(&self) -> Option<FadeTransition> {
        self.pending_fade
    }

    pub fn take_pending_fade(&mut self) -> Option<FadeTransition> {
        self.pending_fade.take()
    }
}
