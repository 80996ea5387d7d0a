/// Asserts that the population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($sim:expr, $count:expr) => {
        assert_eq!($sim.queue().len(), $count, "Population count mismatch");
    };
}

/// Asserts that an organism is gone and no cell still names it as owner.
#[macro_export]
macro_rules! assert_organism_dead {
    ($sim:expr, $id:expr) => {
        assert!(
            $sim.queue().get($id).is_none(),
            "Organism {} should be dead but was found alive",
            $id
        );
        assert_eq!(
            $sim.arena().owned_count($id),
            0,
            "Organism {} still owns cells after death",
            $id
        );
    };
}

/// Asserts that every living organism still owns its whole genome
/// rectangle and that the ownership index agrees with the cells.
#[macro_export]
macro_rules! assert_territory_consistent {
    ($sim:expr) => {
        let arena = $sim.arena();
        for org in $sim.queue().iter() {
            for cell in org.genome.cells() {
                assert_eq!(
                    arena.owner(cell),
                    Some(org.id),
                    "Organism {} lost genome cell {}",
                    org.id,
                    cell
                );
            }
        }
        let counted: usize = $sim.queue().iter().map(|o| arena.owned_count(o.id)).sum();
        assert_eq!(counted, arena.owned_total(), "Ownership index out of sync");
    };
}
