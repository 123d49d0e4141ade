use schelling_core::{ResidentType, SimulationError};
use schelling_system_placement::{Config, Placement};

fn count_of(layout: &[Option<ResidentType>], kind: u32) -> usize {
    layout
        .iter()
        .filter(|slot| **slot == Some(ResidentType::new(kind)))
        .count()
}

#[test]
fn layout_honours_breakdown() {
    let mut placement = Placement::new(Config::new(0x5eed));
    let mut layout = Vec::new();
    placement
        .layout(70, &[30, 25, 15], 100, &mut layout)
        .expect("valid layout");

    assert_eq!(layout.len(), 100);
    assert_eq!(count_of(&layout, 0), 30);
    assert_eq!(count_of(&layout, 1), 25);
    assert_eq!(count_of(&layout, 2), 15);
    assert_eq!(layout.iter().filter(|slot| slot.is_none()).count(), 30);
}

#[test]
fn identical_seeds_replay_identical_layouts() {
    let mut first = Placement::new(Config::new(0x1234_5678));
    let mut second = Placement::new(Config::new(0x1234_5678));
    let mut first_layout = Vec::new();
    let mut second_layout = Vec::new();

    first
        .layout(200, &[100, 100], 400, &mut first_layout)
        .expect("valid layout");
    second
        .layout(200, &[100, 100], 400, &mut second_layout)
        .expect("valid layout");

    assert_eq!(first_layout, second_layout);
}

#[test]
fn different_seeds_diverge() {
    let mut first = Placement::new(Config::new(1));
    let mut second = Placement::new(Config::new(2));
    let mut first_layout = Vec::new();
    let mut second_layout = Vec::new();

    first
        .layout(200, &[100, 100], 400, &mut first_layout)
        .expect("valid layout");
    second
        .layout(200, &[100, 100], 400, &mut second_layout)
        .expect("valid layout");

    assert_ne!(first_layout, second_layout);
}

#[test]
fn overflow_is_rejected_before_drawing() {
    let mut placement = Placement::new(Config::new(3));
    let mut layout = vec![Some(ResidentType::new(0))];

    let result = placement.layout(9, &[9], 9, &mut layout);

    assert_eq!(
        result,
        Err(SimulationError::PopulationOverflow {
            population: 9,
            capacity: 9
        })
    );
    assert_eq!(layout, vec![Some(ResidentType::new(0))]);
}

#[test]
fn mismatched_breakdown_is_rejected() {
    let mut placement = Placement::new(Config::new(3));
    let mut layout = Vec::new();

    let result = placement.layout(5, &[3, 3], 9, &mut layout);

    assert_eq!(
        result,
        Err(SimulationError::PopulationMismatch {
            assigned: 6,
            population: 5
        })
    );
    assert!(layout.is_empty());
}

#[test]
fn empty_population_leaves_every_cell_open() {
    let mut placement = Placement::new(Config::new(11));
    let mut layout = Vec::new();
    placement
        .layout(0, &[0, 0], 16, &mut layout)
        .expect("valid layout");

    assert_eq!(layout, vec![None; 16]);
}
