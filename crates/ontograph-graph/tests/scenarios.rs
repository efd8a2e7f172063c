//! End-to-end scenarios: entity snapshot → graph → settled layout → view

use egui::{Pos2, Vec2};
use ontograph_graph::graph::{EdgeRelation, Gesture, SelectionController};
use ontograph_graph::{
    build_graph, ForceConfig, LayoutEngine, NodeId, NodeKind, SimulationState, ViewportController,
};
use ontograph_types::{Person, Role, Work};
use pretty_assertions::assert_eq;

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

fn painters() -> (Vec<Person>, Vec<Work>) {
    let persons = vec![
        Person::new(1, "Vincent van Gogh")
            .with_role(Role::Painter)
            .with_years(Some(1853), Some(1890))
            .with_works([1]),
        Person::new(2, "Salvador Dalí")
            .with_role(Role::Painter)
            .with_years(Some(1904), Some(1989))
            .with_works([2]),
    ];
    let works = vec![
        Work::painting(1, "The Starry Night")
            .with_creators([1])
            .with_classification("Post-Impressionism", "Night", "1889"),
        Work::painting(2, "The Persistence of Memory")
            .with_creators([2])
            .with_classification("Surrealism", "Time", "1931"),
    ];
    (persons, works)
}

/// Tick until settled; returns the per-tick energy trace
fn run_to_rest(engine: &mut LayoutEngine) -> Vec<f32> {
    let mut energies = Vec::new();
    while engine.tick() {
        energies.push(engine.snapshot().map_or(0.0, |s| s.energy));
        assert!(energies.len() <= 500, "layout did not settle within 500 ticks");
    }
    energies
}

#[test]
fn painters_scenario() {
    let (persons, works) = painters();
    let graph = build_graph(&persons, &works);

    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|e| e.relation == EdgeRelation::Created));
    assert!(graph.edges.iter().all(|e| e.label == "created"));
    assert_eq!(
        graph
            .edges
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect::<Vec<_>>(),
        vec![
            (NodeId::person(1), NodeId::work(1)),
            (NodeId::person(2), NodeId::work(2)),
        ]
    );

    let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
    let _handle = engine.start(graph);
    run_to_rest(&mut engine);
    assert_eq!(engine.state(), SimulationState::Settled);

    let nodes = engine.nodes();
    for (i, a) in nodes.iter().enumerate() {
        assert!(a.position.is_finite());
        for b in &nodes[i + 1..] {
            let d = a.position.distance(b.position);
            assert!(d > 10.0, "{} and {} overlap ({:.2})", a.id, b.id, d);
        }
    }
}

#[test]
fn film_creator_and_actor_scenario() {
    let persons = vec![
        Person::new(1, "Francis Ford Coppola").with_role(Role::Director),
        Person::new(2, "Marlon Brando").with_role(Role::Actor),
    ];
    let works = vec![Work::film(1, "The Godfather")
        .with_creators([1])
        .with_actors([1, 2])];

    let graph = build_graph(&persons, &works);

    let of = |id: NodeId| graph.edges.iter().filter(|e| e.source == id).collect::<Vec<_>>();
    let coppola = of(NodeId::person(1));
    let brando = of(NodeId::person(2));
    assert_eq!(coppola.len(), 1);
    assert_eq!(coppola[0].label, "created");
    assert_eq!(brando.len(), 1);
    assert_eq!(brando[0].label, "acted in");
}

#[test]
fn related_works_are_labeled_by_source_kind() {
    let works = vec![
        Work::book(1, "The Godfather (novel)").with_related([2]),
        Work::film(2, "The Godfather").with_related([1, 99]),
    ];
    let graph = build_graph(&[], &works);

    let labels: Vec<(&str, &str, &str)> = graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("work:1", "work:2", "theme/inspiration"),
            ("work:2", "work:1", "adaptation"),
        ]
    );
    assert_eq!(graph.get_node("work:2").map(|n| n.kind), Some(NodeKind::Film));
}

#[test]
fn energy_decays_and_small_graph_settles() {
    // 30 persons, 20 works: a connected ring plus isolated nodes
    let persons: Vec<Person> = (0..30).map(|i| Person::new(i, format!("P{}", i))).collect();
    let works: Vec<Work> = (0..20)
        .map(|i| Work::book(i, format!("W{}", i)).with_creators([i, (i + 1) % 20]))
        .collect();
    let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
    let _handle = engine.start(build_graph(&persons, &works));

    let energies = run_to_rest(&mut engine);
    assert!(energies.len() <= ForceConfig::default().ticks_to_settle() as usize + 1);

    let mean = |window: &[f32]| window.iter().sum::<f32>() / window.len() as f32;
    let early = mean(&energies[10..60]);
    let late = mean(&energies[energies.len() - 50..]);
    assert!(late < early * 0.1, "energy did not decay: early {} late {}", early, late);
    assert!(energies.iter().all(|e| e.is_finite()));
}

#[test]
fn isolated_nodes_stay_near_center() {
    let persons: Vec<Person> = (0..6).map(|i| Person::new(i, format!("Loner {}", i))).collect();
    let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
    let _handle = engine.start(build_graph(&persons, &[]));
    run_to_rest(&mut engine);

    let center = Pos2::new(VIEWPORT.x / 2.0, VIEWPORT.y / 2.0);
    let n = engine.nodes().len() as f32;
    let centroid = engine
        .nodes()
        .iter()
        .fold(Vec2::ZERO, |acc, node| acc + node.position.to_vec2())
        / n;
    assert!(centroid.to_pos2().distance(center) < 20.0);
}

#[test]
fn viewport_never_moves_nodes_and_selection_survives() {
    let (persons, works) = painters();
    let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
    let _handle = engine.start(build_graph(&persons, &works));
    run_to_rest(&mut engine);

    let mut selection = SelectionController::new();
    assert!(selection.pick(&NodeId::work(2), engine.nodes()));

    let before: Vec<Pos2> = engine.nodes().iter().map(|n| n.position).collect();
    let mut viewport = ViewportController::default();
    viewport.on_gesture(Gesture::Pan(Vec2::new(120.0, -40.0)));
    viewport.on_gesture(Gesture::Zoom {
        factor: 1.7,
        anchor: Pos2::new(300.0, 200.0),
    });
    viewport.on_gesture(Gesture::Zoom {
        factor: 1.0 / 1.7,
        anchor: Pos2::new(300.0, 200.0),
    });
    assert!((viewport.scale() - 1.0).abs() < 1e-5);

    let after: Vec<Pos2> = engine.nodes().iter().map(|n| n.position).collect();
    assert_eq!(before, after);

    // A new layout run over the same snapshot keeps the selection valid
    let _handle = engine.start(build_graph(&persons, &works));
    engine.tick();
    assert_eq!(
        selection.selected_node(engine.nodes()).map(|n| n.label.as_str()),
        Some("The Persistence of Memory")
    );
}
