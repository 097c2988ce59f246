use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use familytree_renderer::config::Config;
use familytree_renderer::diagram::Diagram;
use familytree_renderer::family::{FamilyGraph, Gender, Person, SpouseLink};
use familytree_renderer::layout::DiagramLogic;
use familytree_renderer::render::render_svg;
use familytree_renderer::theme::Theme;
use std::hint::black_box;

/// Build a synthetic family: `generations` descendant tiers under a founder
/// couple, `fanout` children per couple.
fn synthetic_family(generations: usize, fanout: usize) -> FamilyGraph {
    let mut graph = FamilyGraph::new();
    let mut founder = Person::new("g0_0", "Founder 0", Gender::Male);
    founder.spouses.push(SpouseLink::new("g0_0s"));
    graph.add_person(founder);
    graph.add_person(Person::new("g0_0s", "Spouse 0", Gender::Female));

    let mut parents = vec!["g0_0".to_string()];
    let mut counter = 0usize;
    for generation in 1..=generations {
        let mut next = Vec::new();
        for parent in &parents {
            for _ in 0..fanout {
                counter += 1;
                let id = format!("g{generation}_{counter}");
                let gender = if counter % 2 == 0 {
                    Gender::Female
                } else {
                    Gender::Male
                };
                let mut child = Person::new(&id, &format!("Person {counter}"), gender);
                child.parents.push(parent.clone());
                graph.add_person(child);
                next.push(id);
            }
        }
        parents = next;
    }
    graph.normalize();
    graph.set_current(Some("g0_0"));
    graph
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for (name, generations, fanout) in [("small", 2, 2), ("medium", 3, 3), ("wide", 2, 8)] {
        let graph = synthetic_family(generations, fanout);
        let config = Config::default();
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let logic = DiagramLogic::with_current_year(config.layout.clone(), 2026);
                let mut diagram = Diagram::with_logic(Theme::modern(), logic);
                diagram.rebuild(black_box(graph));
                black_box(diagram.node_count())
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let graph = synthetic_family(3, 3);
    let config = Config::default();
    let logic = DiagramLogic::with_current_year(config.layout.clone(), 2026);
    let mut diagram = Diagram::with_logic(Theme::modern(), logic);
    diagram.rebuild(&graph);

    c.bench_function("render_svg", |b| {
        b.iter(|| black_box(render_svg(black_box(&diagram), &config.render)));
    });
}

fn bench_filter(c: &mut Criterion) {
    let graph = synthetic_family(3, 3);
    let config = Config::default();
    let logic = DiagramLogic::with_current_year(config.layout.clone(), 2026);
    let mut diagram = Diagram::with_logic(Theme::modern(), logic);
    diagram.rebuild(&graph);

    c.bench_function("set_display_year", |b| {
        let mut year = 1900;
        b.iter(|| {
            year = if year == 1900 { 2026 } else { 1900 };
            diagram.set_display_year(black_box(year));
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_render, bench_filter);
criterion_main!(benches);
