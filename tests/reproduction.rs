mod common;

use common::SimulationBuilder;
use mycora_data::Coord;
use proptest::prelude::*;
use std::collections::HashSet;

fn wrapped_cells(sim: &mycora_core::Simulation, rect: mycora_data::Rect) -> HashSet<Coord> {
    rect.cells().map(|c| sim.arena().wrap(c)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn test_births_never_overlap_parents(
        seed in 0u64..1000,
        mutation in 0.0f64..0.2,
        ticks in 20u64..150
    ) {
        let mut sim = SimulationBuilder::new()
            .with_size(30, 12)
            .with_seed(seed)
            .with_config(|c| {
                c.arena.decay_probability = 0.2;
                c.vm.copy_mutation_rate = mutation;
                c.clock.pressure_period = Some(25);
                c.pressure.high_water = 0.6;
                c.pressure.low_water = 0.4;
            })
            .with_genome("@C$", 0, 0)
            .with_genome("@C$", 10, 6)
            .build();

        for _ in 0..ticks {
            let before: HashSet<_> = sim.queue().iter().map(|o| o.id).collect();
            let report = sim.tick();

            for child in sim.queue().iter().filter(|o| !before.contains(&o.id)) {
                let child_cells = wrapped_cells(&sim, child.genome);
                for cell in &child_cells {
                    prop_assert_eq!(sim.arena().owner(*cell), Some(child.id));
                }
                if let Some(parent) = child.parent.and_then(|p| sim.queue().get(p)) {
                    let parent_cells = wrapped_cells(&sim, parent.genome);
                    prop_assert!(child_cells.is_disjoint(&parent_cells));
                }
            }
            for id in &report.evicted {
                prop_assert_eq!(sim.arena().owned_count(*id), 0);
            }
            assert_territory_consistent!(sim);
        }
    }
}

#[test]
fn test_divide_before_copy_is_refused() {
    let mut sim = SimulationBuilder::new().with_genome("@$C", 0, 0).build();

    sim.run(2);

    assert_population!(sim, 1);
    let org = sim.queue().get_organism().unwrap();
    assert_eq!(org.last_fault, Some(mycora_core::Fault::IncompleteOffspring));
    assert!(org.offspring.is_some());
    assert_eq!(sim.arena().owned_count(org.id), 6);
}
