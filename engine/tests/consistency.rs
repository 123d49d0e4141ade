use proptest::prelude::*;
use schelling_core::{Parameters, ResidentType};
use schelling_engine::Simulation;

/// Splits `population` across `types` so the rounded breakdown reproduces it exactly.
fn fractions(population: usize, types: usize) -> Vec<f64> {
    if population == 0 {
        return vec![1.0 / types as f64; types];
    }
    let base = population / types;
    let remainder = population - base * types;
    (0..types)
        .map(|kind| {
            let count = if kind == 0 { base + remainder } else { base };
            count as f64 / population as f64
        })
        .collect()
}

fn type_counts(simulation: &Simulation, types: usize) -> Vec<usize> {
    let mut counts = vec![0; types];
    for (_, occupant) in simulation.city().cells() {
        if let Some(resident) = occupant {
            counts[resident.kind().get() as usize] += 1;
        }
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn incremental_scores_track_recomputation(
        height in 2usize..12,
        width in 2usize..12,
        radius in 0usize..4,
        types in 1usize..=3,
        fill in 0usize..100,
        threshold in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let cells = height * width;
        let population = (cells * fill / 100).min(cells - 1);
        let parameters = Parameters::new(height, width, radius, population, fractions(population, types));
        let mut simulation = Simulation::new(&parameters, seed).expect("simulation");
        simulation.place_residents().expect("placement");
        simulation.initialize(threshold).expect("initialize");
        prop_assert_eq!(simulation.check_consistency(), Ok(()));

        let expected_counts = type_counts(&simulation, types);
        prop_assert_eq!(expected_counts.iter().sum::<usize>(), population);

        let mut events = Vec::new();
        for pass in 1..=20u64 {
            simulation.iterate(&mut events).expect("iterate");
            prop_assert_eq!(simulation.iteration(), pass);
            prop_assert_eq!(simulation.check_consistency(), Ok(()));
            prop_assert_eq!(type_counts(&simulation, types), expected_counts.clone());
            if simulation.is_settled() {
                break;
            }
        }
    }

    #[test]
    fn unknown_types_never_reach_the_city(
        width in 2usize..10,
        kind in 2u32..6,
    ) {
        let parameters = Parameters::new(1, width, 1, 1, vec![0.5, 0.5]);
        let mut simulation = Simulation::new(&parameters, 0).expect("simulation");
        let mut layout = vec![None; width];
        layout[0] = Some(ResidentType::new(kind));

        prop_assert!(simulation.place_layout(&layout).is_err());
        prop_assert_eq!(simulation.city().population(), 0);
    }
}
