use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::family::{FamilyGraph, Gender, Person, current_calendar_year};

use super::connector::DiagramConnector;
use super::group::DiagramGroup;
use super::node::DiagramNode;
use super::row::DiagramRow;
use super::types::{ConnectorEnd, NodeType};

/// Reduces the family graph around the current person to rows, groups,
/// nodes and connectors. Owns the year filter and the person-to-endpoint
/// lookup for the lifetime of one build.
pub struct DiagramLogic {
    config: LayoutConfig,
    current_year: i32,
    display_year: i32,
    /// rows[0] is the oldest ancestor generation; descendants grow downward.
    rows: Vec<DiagramRow>,
    primary_row: usize,
    connectors: Vec<DiagramConnector>,
    person_lookup: HashMap<String, ConnectorEnd>,
}

impl DiagramLogic {
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_current_year(config, current_calendar_year())
    }

    /// Pin the clock, used by tests and by hosts that already track time.
    pub fn with_current_year(config: LayoutConfig, current_year: i32) -> Self {
        Self {
            config,
            current_year,
            display_year: current_year,
            rows: Vec::new(),
            primary_row: 0,
            connectors: Vec::new(),
            person_lookup: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn rows(&self) -> &[DiagramRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [DiagramRow] {
        &mut self.rows
    }

    pub fn primary_row_index(&self) -> usize {
        self.primary_row
    }

    pub fn connectors(&self) -> &[DiagramConnector] {
        &self.connectors
    }

    pub fn connectors_mut(&mut self) -> &mut [DiagramConnector] {
        &mut self.connectors
    }

    pub fn lookup(&self, person_id: &str) -> Option<ConnectorEnd> {
        self.person_lookup.get(person_id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.rows.iter().map(DiagramRow::node_count).sum()
    }

    pub fn display_year(&self) -> i32 {
        self.display_year
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.connectors.clear();
        self.person_lookup.clear();
        self.primary_row = 0;
    }

    /// Rebuild everything around the graph's current person. A missing or
    /// dangling current selection yields an empty diagram.
    pub fn rebuild(&mut self, graph: &FamilyGraph) {
        self.clear();
        let Some(primary) = graph.current() else {
            return;
        };

        let max_nodes = self.config.diagram.maximum_nodes;
        let generation_multiplier = self.config.diagram.generation_multiplier;
        let mut displayed: HashSet<String> = HashSet::new();

        let primary_row = self.build_primary_row(graph, primary, &mut displayed);
        let mut total = primary_row.node_count();

        // Grow toward descendants, then ancestors; both directions share
        // the same node cap. A generation that would overflow is dropped
        // whole rather than truncated.
        let mut descendant_rows: Vec<DiagramRow> = Vec::new();
        let mut frontier = children_of(graph, std::slice::from_ref(&primary.id));
        let mut scale = 1.0f32;
        while !frontier.is_empty() {
            scale *= generation_multiplier;
            let mut tentative = displayed.clone();
            let row = self.build_descendant_row(graph, &frontier, scale, &mut tentative);
            if row.node_count() == 0 || total + row.node_count() > max_nodes {
                break;
            }
            total += row.node_count();
            displayed = tentative;
            descendant_rows.push(row);
            frontier = children_of(graph, &frontier)
                .into_iter()
                .filter(|id| !displayed.contains(id))
                .collect();
        }

        let mut ancestor_rows: Vec<DiagramRow> = Vec::new();
        let mut frontier = parents_of(graph, std::slice::from_ref(&primary.id));
        let mut scale = 1.0f32;
        while !frontier.is_empty() {
            scale *= generation_multiplier;
            let mut tentative = displayed.clone();
            let row = self.build_ancestor_row(graph, &frontier, scale, &mut tentative);
            if row.node_count() == 0 || total + row.node_count() > max_nodes {
                break;
            }
            total += row.node_count();
            displayed = tentative;
            ancestor_rows.push(row);
            frontier = parents_of(graph, &frontier)
                .into_iter()
                .filter(|id| !displayed.contains(id))
                .collect();
        }

        // Oldest generation first, primary in the middle, children below.
        self.primary_row = ancestor_rows.len();
        ancestor_rows.reverse();
        self.rows = ancestor_rows;
        self.rows.push(primary_row);
        self.rows.extend(descendant_rows);

        self.index_people();
        self.build_connectors(graph);
    }

    fn make_node(&self, person: &Person, node_type: NodeType, scale: f32) -> DiagramNode {
        DiagramNode::new(
            person.clone(),
            node_type,
            scale,
            self.display_year,
            &self.config.diagram,
        )
    }

    fn build_primary_row(
        &self,
        graph: &FamilyGraph,
        primary: &Person,
        displayed: &mut HashSet<String>,
    ) -> DiagramRow {
        let config = &self.config.diagram;
        let related_scale = config.related_multiplier;
        let mut row = DiagramRow::new(config.primary_row_group_space);
        let mut group = DiagramGroup::new();
        displayed.insert(primary.id.clone());

        let mut left_half: Vec<&Person> = Vec::new();
        let mut full: Vec<&Person> = Vec::new();
        let mut right_half: Vec<&Person> = Vec::new();
        for sibling in graph.siblings_of(primary) {
            if !displayed.insert(sibling.id.clone()) {
                continue;
            }
            match classify_sibling(graph, primary, sibling) {
                NodeType::SiblingLeft => left_half.push(sibling),
                NodeType::SiblingRight => right_half.push(sibling),
                _ => full.push(sibling),
            }
        }

        for person in &left_half {
            group.add_node(self.make_node(person, NodeType::SiblingLeft, related_scale));
        }
        for spouse in graph.previous_spouses_of(primary) {
            if displayed.insert(spouse.id.clone()) {
                group.add_node(self.make_node(spouse, NodeType::Spouse, related_scale));
            }
        }
        group.add_node(self.make_node(primary, NodeType::Primary, 1.0));
        for spouse in graph.spouses_of(primary) {
            if displayed.insert(spouse.id.clone()) {
                group.add_node(self.make_node(spouse, NodeType::Spouse, related_scale));
            }
        }
        for person in &full {
            group.add_node(self.make_node(person, NodeType::Sibling, related_scale));
        }
        for person in &right_half {
            group.add_node(self.make_node(person, NodeType::SiblingRight, related_scale));
        }

        row.add_group(group);
        row
    }

    /// One group per child: the child plus their not-yet-shown spouses.
    fn build_descendant_row(
        &self,
        graph: &FamilyGraph,
        frontier: &[String],
        scale: f32,
        displayed: &mut HashSet<String>,
    ) -> DiagramRow {
        let config = &self.config.diagram;
        let spouse_scale = scale * config.related_multiplier;
        let mut row = DiagramRow::new(config.child_row_group_space);

        for id in frontier {
            let Some(person) = graph.person(id) else {
                continue;
            };
            if !displayed.insert(person.id.clone()) {
                continue;
            }
            let mut group = DiagramGroup::new();
            group.add_node(self.make_node(person, NodeType::Related, scale));
            for spouse in graph
                .spouses_of(person)
                .into_iter()
                .chain(graph.previous_spouses_of(person))
            {
                if displayed.insert(spouse.id.clone()) {
                    group.add_node(self.make_node(spouse, NodeType::Spouse, spouse_scale));
                }
            }
            row.add_group(group);
        }
        row
    }

    /// One group per nuclear couple: two parents who are spouses of each
    /// other share a group, anyone else stands alone.
    fn build_ancestor_row(
        &self,
        graph: &FamilyGraph,
        frontier: &[String],
        scale: f32,
        displayed: &mut HashSet<String>,
    ) -> DiagramRow {
        let config = &self.config.diagram;
        let mut row = DiagramRow::new(config.parent_row_group_space);

        for id in frontier {
            let Some(person) = graph.person(id) else {
                continue;
            };
            if !displayed.insert(person.id.clone()) {
                continue;
            }
            let mut group = DiagramGroup::new();
            group.add_node(self.make_node(person, NodeType::Related, scale));
            for other_id in frontier {
                if other_id == id || displayed.contains(other_id) {
                    continue;
                }
                let Some(other) = graph.person(other_id) else {
                    continue;
                };
                if graph.are_spouses(person, other) {
                    displayed.insert(other.id.clone());
                    group.add_node(self.make_node(other, NodeType::Related, scale));
                }
            }
            row.add_group(group);
        }
        row
    }

    fn index_people(&mut self) {
        for (r, row) in self.rows.iter().enumerate() {
            for (g, group) in row.groups().iter().enumerate() {
                for (n, node) in group.nodes().iter().enumerate() {
                    self.person_lookup
                        .entry(node.person.id.clone())
                        .or_insert(ConnectorEnd {
                            row: r,
                            group: g,
                            node: n,
                        });
                }
            }
        }
    }

    /// Connectors are rebuilt from scratch once the rows are final: child
    /// connectors for every displayed parent-child pair, then spouse
    /// connectors for every displayed couple (current or former).
    fn build_connectors(&mut self, graph: &FamilyGraph) {
        let config = self.config.diagram.clone();
        let mut order: HashMap<&str, usize> = HashMap::new();
        let mut people: Vec<&Person> = Vec::new();
        for row in &self.rows {
            for group in row.groups() {
                for node in group.nodes() {
                    order.insert(node.person.id.as_str(), people.len());
                    people.push(&node.person);
                }
            }
        }

        let mut connectors: Vec<DiagramConnector> = Vec::new();
        for person in &people {
            let Some(end) = self.person_lookup.get(&person.id).copied() else {
                continue;
            };
            for parent_id in &person.parents {
                if let Some(start) = self.person_lookup.get(parent_id).copied() {
                    connectors.push(DiagramConnector::child(start, end, &config));
                }
            }
        }
        for person in &people {
            let Some(start) = self.person_lookup.get(&person.id).copied() else {
                continue;
            };
            for (links, former) in [(&person.spouses, false), (&person.previous_spouses, true)] {
                for link in links {
                    let Some(end) = self.person_lookup.get(&link.id).copied() else {
                        continue;
                    };
                    // One connector per couple: the first-indexed end owns it.
                    let (Some(&a), Some(&b)) =
                        (order.get(person.id.as_str()), order.get(link.id.as_str()))
                    else {
                        continue;
                    };
                    if a >= b {
                        continue;
                    }
                    connectors.push(DiagramConnector::spouse(
                        start,
                        end,
                        link.married_date,
                        link.divorced_date,
                        former,
                        &config,
                    ));
                }
            }
        }

        // Initial filter state comes from the endpoints, with no transition.
        for connector in &mut connectors {
            let filtered = endpoint_filtered(&self.rows, connector);
            connector.is_filtered = filtered;
            connector.opacity = if filtered {
                config.opacity_filtered
            } else {
                config.opacity_normal
            };
        }
        self.connectors = connectors;
    }

    /// Re-filter every node and connector for a new display year. Layout is
    /// untouched; only filter states, age labels and fade requests change.
    pub fn set_display_year(&mut self, year: i32) {
        self.display_year = year;
        let config = self.config.diagram.clone();
        for row in &mut self.rows {
            for group in row.groups_mut() {
                for node in group.nodes_mut() {
                    node.set_display_year(year, &config);
                }
            }
        }
        let rows = &self.rows;
        for connector in &mut self.connectors {
            let filtered = endpoint_filtered(rows, connector);
            connector.set_filtered(filtered, &config);
        }
    }

    /// Earliest year across displayed birth dates and marriage/divorce
    /// dates; the current year when nothing is dated.
    pub fn minimum_year(&self) -> i32 {
        let mut minimum: Option<i32> = None;
        let mut fold = |year: Option<i32>| {
            if let Some(year) = year {
                minimum = Some(minimum.map_or(year, |m| m.min(year)));
            }
        };
        for row in &self.rows {
            for group in row.groups() {
                for node in group.nodes() {
                    fold(node.person.birth_year());
                }
            }
        }
        for connector in &self.connectors {
            fold(connector.married_year());
            fold(connector.divorced_year());
        }
        minimum.unwrap_or(self.current_year)
    }
}

fn endpoint_filtered(rows: &[DiagramRow], connector: &DiagramConnector) -> bool {
    let start = connector
        .start
        .node(rows)
        .map(|node| node.is_filtered)
        .unwrap_or(false);
    let end = connector
        .end
        .node(rows)
        .map(|node| node.is_filtered)
        .unwrap_or(false);
    start || end
}

fn children_of(graph: &FamilyGraph, ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        let Some(person) = graph.person(id) else {
            continue;
        };
        for child in &person.children {
            if !out.contains(child) {
                out.push(child.clone());
            }
        }
    }
    out
}

fn parents_of(graph: &FamilyGraph, ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        let Some(person) = graph.person(id) else {
            continue;
        };
        for parent in &person.parents {
            if !out.contains(parent) {
                out.push(parent.clone());
            }
        }
    }
    out
}

/// Full siblings share the primary's exact parent set. A sibling sharing
/// only some parents is a half-sibling, sided by the shared parent: father
/// left, mother right.
fn classify_sibling(graph: &FamilyGraph, primary: &Person, sibling: &Person) -> NodeType {
    let primary_parents: BTreeSet<&String> = primary.parents.iter().collect();
    let sibling_parents: BTreeSet<&String> = sibling.parents.iter().collect();
    if primary_parents == sibling_parents {
        return NodeType::Sibling;
    }
    let shared = primary_parents
        .intersection(&sibling_parents)
        .next()
        .and_then(|id| graph.person(id));
    match shared {
        None => NodeType::Sibling,
        Some(parent) if parent.gender == Gender::Female => NodeType::SiblingRight,
        Some(_) => NodeType::SiblingLeft,
    }
}
