use chrono::NaiveDate;
use familytree_renderer::config::Config;
use familytree_renderer::diagram::Diagram;
use familytree_renderer::family::{FamilyGraph, Gender, Person, SpouseLink};
use familytree_renderer::layout::{DiagramLogic, NodeType};
use familytree_renderer::layout_dump::DiagramDump;
use familytree_renderer::theme::Theme;

// Pin the clock so ages and default years are stable.
const NOW: i32 = 2026;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn person_born(id: &str, name: &str, gender: Gender, birth: i32) -> Person {
    let mut person = Person::new(id, name, gender);
    person.birth_date = Some(date(birth, 6, 15));
    person
}

fn diagram_for(graph: &FamilyGraph) -> Diagram {
    let config = Config::default();
    let logic = DiagramLogic::with_current_year(config.layout.clone(), NOW);
    let mut diagram = Diagram::with_logic(Theme::modern(), logic);
    diagram.rebuild(graph);
    diagram
}

/// Alice (primary, b. 1980) married to Bob (b. 1978, since 2003), one
/// child Carol (b. 2005).
fn alice_family() -> FamilyGraph {
    let mut graph = FamilyGraph::new();
    let mut alice = person_born("alice", "Alice", Gender::Female, 1980);
    alice.spouses.push(SpouseLink {
        id: "bob".to_string(),
        married_date: Some(date(2003, 6, 1)),
        divorced_date: None,
    });
    alice.children.push("carol".to_string());
    graph.add_person(alice);
    graph.add_person(person_born("bob", "Bob", Gender::Male, 1978));
    let mut carol = person_born("carol", "Carol", Gender::Female, 2005);
    carol.parents.push("bob".to_string());
    graph.add_person(carol);
    graph.normalize();
    graph.set_current(Some("alice"));
    graph
}

fn all_nodes(diagram: &Diagram) -> Vec<&familytree_renderer::layout::DiagramNode> {
    diagram
        .rows()
        .iter()
        .flat_map(|row| row.groups())
        .flat_map(|group| group.nodes())
        .collect()
}

fn node<'a>(
    diagram: &'a Diagram,
    id: &str,
) -> &'a familytree_renderer::layout::DiagramNode {
    all_nodes(diagram)
        .into_iter()
        .find(|node| node.person.id == id)
        .unwrap_or_else(|| panic!("node {id} not displayed"))
}

#[test]
fn primary_spouse_child_layout() {
    let graph = alice_family();
    let diagram = diagram_for(&graph);

    // No parents recorded: primary row plus one children row.
    assert_eq!(diagram.rows().len(), 2);
    assert_eq!(diagram.node_count(), 3);

    let primary_row = &diagram.rows()[0];
    assert_eq!(primary_row.groups().len(), 1);
    let types: Vec<NodeType> = primary_row.groups()[0]
        .nodes()
        .iter()
        .map(|node| node.node_type)
        .collect();
    assert_eq!(types, vec![NodeType::Primary, NodeType::Spouse]);

    let carol = node(&diagram, "carol");
    assert_eq!(carol.node_type, NodeType::Related);
    // One generation down: base row scale.
    assert!((carol.scale - 0.9).abs() < 1e-6);
    let bob = node(&diagram, "bob");
    assert!((bob.scale - 0.8).abs() < 1e-6);
}

#[test]
fn minimum_year_is_earliest_date() {
    let graph = alice_family();
    let diagram = diagram_for(&graph);
    assert_eq!(diagram.minimum_year(), 1978);
}

#[test]
fn minimum_year_defaults_to_current() {
    let mut graph = FamilyGraph::new();
    graph.add_person(Person::new("a", "Ann", Gender::Female));
    graph.set_current(Some("a"));
    let diagram = diagram_for(&graph);
    assert_eq!(diagram.minimum_year(), NOW);
}

#[test]
fn year_filter_dims_only_the_unborn() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    diagram.take_pending_fades();

    diagram.set_display_year(1990);
    assert!(node(&diagram, "carol").is_filtered);
    assert!(!node(&diagram, "alice").is_filtered);
    assert!(!node(&diagram, "bob").is_filtered);

    // Both parent-child connectors touch Carol and dim with her; the
    // spouse connector between Alice and Bob stays lit.
    let filtered_connectors: Vec<bool> = diagram
        .connectors()
        .iter()
        .map(|connector| connector.is_filtered)
        .collect();
    assert_eq!(filtered_connectors.iter().filter(|f| **f).count(), 2);
    assert!(
        diagram
            .connectors()
            .iter()
            .filter(|connector| connector.is_filtered)
            .all(|connector| connector.is_child_connector())
    );

    let fades = diagram.take_pending_fades();
    assert!(!fades.is_empty());
    // Carol fades toward the dimmed opacity.
    assert!(fades.iter().any(|fade| (fade.to - 0.15).abs() < 1e-6));

    // Anyone born after the year dims, including the primary.
    diagram.set_display_year(1979);
    assert!(node(&diagram, "alice").is_filtered);
    assert!(!node(&diagram, "bob").is_filtered);
}

#[test]
fn repeated_filter_year_starts_no_transition() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    diagram.set_display_year(1979);
    diagram.take_pending_fades();

    diagram.set_display_year(1979);
    assert!(diagram.take_pending_fades().is_empty());
}

#[test]
fn rebuild_is_deterministic() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    let first = serde_json::to_string(&DiagramDump::from_diagram(&diagram)).expect("dump");
    diagram.rebuild(&graph);
    let second = serde_json::to_string(&DiagramDump::from_diagram(&diagram)).expect("dump");
    assert_eq!(first, second);
}

#[test]
fn one_node_per_person_across_paths() {
    // Dan is both Eve's sibling and a child of the same parents: reachable
    // as the primary row sibling and via the parents' children.
    let mut graph = FamilyGraph::new();
    let mut mom = person_born("mom", "Mona", Gender::Female, 1950);
    mom.children = vec!["eve".to_string(), "dan".to_string()];
    graph.add_person(mom);
    let mut dad = person_born("dad", "Dave", Gender::Male, 1948);
    dad.children = vec!["eve".to_string(), "dan".to_string()];
    graph.add_person(dad);
    graph.add_person(person_born("eve", "Eve", Gender::Female, 1980));
    graph.add_person(person_born("dan", "Dan", Gender::Male, 1982));
    graph.normalize();
    graph.set_current(Some("eve"));

    let diagram = diagram_for(&graph);
    let nodes = all_nodes(&diagram);
    let mut ids: Vec<&str> = nodes.iter().map(|node| node.person.id.as_str()).collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    assert_eq!(before, ids.len(), "duplicate nodes for one person");
    assert_eq!(diagram.node_count(), 4);
}

#[test]
fn half_siblings_split_by_shared_parent() {
    let mut graph = FamilyGraph::new();
    let mut mom = person_born("mom", "Mona", Gender::Female, 1950);
    mom.children = vec!["p".to_string(), "s1".to_string(), "s2".to_string()];
    graph.add_person(mom);
    let mut dad = person_born("dad", "Dave", Gender::Male, 1948);
    dad.children = vec!["p".to_string(), "s1".to_string(), "s3".to_string()];
    graph.add_person(dad);
    graph.add_person(person_born("p", "Pia", Gender::Female, 1975));
    graph.add_person(person_born("s1", "Selma", Gender::Female, 1977));
    graph.add_person(person_born("s2", "Sven", Gender::Male, 1979));
    graph.add_person(person_born("s3", "Stig", Gender::Male, 1981));
    graph.normalize();
    graph.set_current(Some("p"));

    let diagram = diagram_for(&graph);
    // Shares both parents.
    assert_eq!(node(&diagram, "s1").node_type, NodeType::Sibling);
    // Shares only the mother.
    assert_eq!(node(&diagram, "s2").node_type, NodeType::SiblingRight);
    // Shares only the father.
    assert_eq!(node(&diagram, "s3").node_type, NodeType::SiblingLeft);
}

#[test]
fn capacity_drops_whole_generations() {
    // 2 children, 8 grandchildren, 48 great-grandchildren: the last
    // generation would blow the 50-node cap and must vanish entirely.
    let mut graph = FamilyGraph::new();
    graph.add_person(person_born("root", "Root", Gender::Male, 1900));
    let mut generation = vec!["root".to_string()];
    let mut counter = 0usize;
    for (depth, fanout) in [(1usize, 2usize), (2, 4), (3, 6)] {
        let mut next = Vec::new();
        for parent_id in &generation {
            for _ in 0..fanout {
                counter += 1;
                let id = format!("d{depth}_{counter}");
                let mut child = person_born(&id, &id, Gender::Female, 1900 + depth as i32 * 25);
                child.parents.push(parent_id.clone());
                graph.add_person(child);
                next.push(id);
            }
        }
        generation = next;
    }
    graph.normalize();
    graph.set_current(Some("root"));

    let diagram = diagram_for(&graph);
    assert!(diagram.node_count() < 50);
    assert_eq!(diagram.node_count(), 1 + 2 + 8);
    // No partial third generation.
    assert_eq!(diagram.rows().len(), 3);
    assert!(all_nodes(&diagram)
        .iter()
        .all(|node| !node.person.id.starts_with("d3_")));
}

#[test]
fn child_connectors_draw_before_spouse_connectors() {
    let graph = alice_family();
    let diagram = diagram_for(&graph);
    let order = diagram.connectors_in_draw_order();
    assert!(!order.is_empty());
    let first_non_child = order
        .iter()
        .position(|connector| !connector.is_child_connector())
        .unwrap_or(order.len());
    assert!(
        order[first_non_child..]
            .iter()
            .all(|connector| !connector.is_child_connector())
    );
    // Both kinds are present in this family.
    assert!(order.first().map(|c| c.is_child_connector()).unwrap_or(false));
    assert!(!order.last().map(|c| c.is_child_connector()).unwrap_or(true));
}

#[test]
fn one_spouse_connector_per_couple() {
    let graph = alice_family();
    let diagram = diagram_for(&graph);
    let spouse_connectors = diagram
        .connectors()
        .iter()
        .filter(|connector| !connector.is_child_connector())
        .count();
    assert_eq!(spouse_connectors, 1);
    // Child connectors: alice->carol and bob->carol.
    assert_eq!(diagram.connectors().len() - spouse_connectors, 2);
}

#[test]
fn ancestors_stack_above_the_primary_row() {
    let mut graph = FamilyGraph::new();
    let mut mom = person_born("mom", "Mona", Gender::Female, 1950);
    mom.children.push("kid".to_string());
    mom.spouses.push(SpouseLink::new("dad"));
    graph.add_person(mom);
    let mut dad = person_born("dad", "Dave", Gender::Male, 1948);
    dad.children.push("kid".to_string());
    graph.add_person(dad);
    graph.add_person(person_born("kid", "Kim", Gender::Female, 1980));
    graph.normalize();
    graph.set_current(Some("kid"));

    let diagram = diagram_for(&graph);
    assert_eq!(diagram.rows().len(), 2);
    let parents_row = &diagram.rows()[0];
    // The couple shares one group.
    assert_eq!(parents_row.groups().len(), 1);
    assert_eq!(parents_row.node_count(), 2);
    assert!(parents_row.location.y < diagram.rows()[1].location.y);
    // Parent generation shrinks by the generation multiplier.
    for parent in parents_row.groups()[0].nodes() {
        assert!((parent.scale - 0.9).abs() < 1e-6);
    }
}

#[test]
fn empty_diagram_without_current_person() {
    let mut graph = FamilyGraph::new();
    graph.add_person(Person::new("a", "Ann", Gender::Female));
    let diagram = diagram_for(&graph);
    assert_eq!(diagram.rows().len(), 0);
    assert_eq!(diagram.node_count(), 0);
    assert!(diagram.primary_bounds().is_none());
}

#[test]
fn scale_leaves_layout_untouched() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    let before = diagram.total_size();
    let bounds_before = diagram.primary_bounds().expect("primary bounds");
    diagram.set_scale(2.0);
    assert_eq!(diagram.total_size(), before);
    assert_eq!(diagram.primary_bounds().expect("primary bounds"), bounds_before);
}

#[test]
fn click_resolves_the_primary_node() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    let bounds = diagram.primary_bounds().expect("primary bounds");
    let hit = diagram
        .activate_node_at(bounds.center())
        .expect("expected a hit");
    assert_eq!(hit.id, "alice");

    // Scaled coordinates still resolve.
    diagram.set_scale(2.0);
    let center = bounds.center();
    let hit = diagram
        .activate_node_at(familytree_renderer::layout::Point::new(
            center.x * 2.0,
            center.y * 2.0,
        ))
        .expect("expected a hit at 2x");
    assert_eq!(hit.id, "alice");
}

#[test]
fn selected_bounds_track_a_non_primary_node() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    diagram.set_selected(Some("bob"));
    let selected = diagram.selected_bounds().expect("selected bounds");
    let primary = diagram.primary_bounds().expect("primary bounds");
    assert!(selected.x > primary.x);
}

#[test]
fn ages_follow_the_display_year() {
    let mut graph = alice_family();
    // Bob died in 2010.
    if let Some(bob) = graph.person_mut("bob") {
        bob.death_date = Some(date(2010, 2, 2));
        bob.is_living = false;
    }
    graph.set_current(Some("alice"));
    let mut diagram = diagram_for(&graph);

    assert_eq!(node(&diagram, "alice").age_text, (NOW - 1980).to_string());
    // Frozen at death.
    assert_eq!(node(&diagram, "bob").age_text, "32");

    diagram.set_display_year(1990);
    assert_eq!(node(&diagram, "alice").age_text, "10");
    assert_eq!(node(&diagram, "bob").age_text, "12");
    // Not yet born: clamped, and dimmed.
    assert_eq!(node(&diagram, "carol").age_text, "0");
    assert!(node(&diagram, "carol").is_filtered);
}

#[test]
fn populate_requests_staggered_fades() {
    let graph = alice_family();
    let mut diagram = diagram_for(&graph);
    let fades = diagram.take_pending_fades();
    // Every node and connector got a fade-in request from zero.
    assert_eq!(fades.len(), diagram.node_count() + diagram.connectors().len());
    assert!(fades.iter().all(|fade| fade.from == 0.0));
    // Rows fade in after the populate pause, later rows later.
    let delays: Vec<f32> = fades.iter().map(|fade| fade.delay_ms).collect();
    let min = delays.iter().cloned().fold(f32::MAX, f32::min);
    let max = delays.iter().cloned().fold(f32::MIN, f32::max);
    assert!(min >= 600.0);
    assert!(max > min);
}

#[test]
fn fixture_family_renders() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("family.json");
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let graph = familytree_renderer::parse_family(&input).expect("parse failed");

    let config = Config::default();
    let logic = DiagramLogic::with_current_year(config.layout.clone(), NOW);
    let mut diagram = Diagram::with_logic(Theme::modern(), logic);
    diagram.rebuild(&graph);

    // Petra is the focus: full sibling Sofie, half-brother Jan through
    // their father Henk, husbandless, one son, grandparents two rows up.
    assert_eq!(node(&diagram, "petra").node_type, NodeType::Primary);
    assert_eq!(node(&diagram, "sofie").node_type, NodeType::Sibling);
    assert_eq!(node(&diagram, "jan").node_type, NodeType::SiblingLeft);
    assert_eq!(diagram.rows().len(), 4);
    assert!(diagram.node_count() <= 50);
    assert_eq!(diagram.minimum_year(), 1921);

    let svg = familytree_renderer::render_svg(&diagram, &config.render);
    assert!(svg.contains("<svg"), "missing <svg tag");
    assert!(svg.contains("Petra de Vries"));
    assert!(svg.contains("</svg>"), "missing </svg tag");
}

#[test]
fn former_spouses_carry_their_dates() {
    let mut graph = FamilyGraph::new();
    let mut ann = person_born("ann", "Ann", Gender::Female, 1940);
    ann.previous_spouses.push(SpouseLink {
        id: "ex".to_string(),
        married_date: Some(date(1960, 1, 1)),
        divorced_date: Some(date(1970, 1, 1)),
    });
    graph.add_person(ann);
    graph.add_person(person_born("ex", "Eddie", Gender::Male, 1938));
    graph.normalize();
    graph.set_current(Some("ann"));

    let diagram = diagram_for(&graph);
    let connector = diagram
        .connectors()
        .iter()
        .find(|connector| !connector.is_child_connector())
        .expect("spouse connector");
    assert_eq!(connector.married_year(), Some(1960));
    assert_eq!(connector.divorced_year(), Some(1970));
    // Marriage dates feed the year slider lower bound.
    assert_eq!(diagram.minimum_year(), 1938);
}
