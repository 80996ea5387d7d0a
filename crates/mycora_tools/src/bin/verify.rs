use clap::Parser;
use mycora_core::config::AppConfig;
use mycora_core::lineage_registry::LineageRecord;
use mycora_core::snapshot::PopulationStats;
use mycora_core::{init_logging, Simulation};
use mycora_data::Coord;
use rayon::prelude::*;
use serde::Serialize;

/// Replays a run to check determinism, then runs a seed ensemble in
/// parallel and reports population outcomes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "genomes/initial.gen")]
    genome: String,

    /// Optional config file; defaults are used when absent.
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long, default_value_t = 2000)]
    ticks: u64,

    /// Number of seeds in the ensemble.
    #[arg(short, long, default_value_t = 8)]
    seeds: u64,

    #[arg(long, default_value_t = 1)]
    base_seed: u64,

    /// Write ensemble results as JSON here.
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Serialize, Debug)]
struct SeedOutcome {
    seed: u64,
    digest: String,
    stats: PopulationStats,
    /// Most prolific lineages, best first.
    top_lineages: Vec<LineageRecord>,
}

/// Lineages kept per seed in the report.
const TOP_LINEAGES: usize = 3;

fn run_seed(config: &AppConfig, genome: &[Vec<char>], seed: u64, ticks: u64) -> anyhow::Result<SeedOutcome> {
    let mut config = config.clone();
    config.clock.seed = Some(seed);
    let center = Coord::new(
        i32::from(config.arena.width) / 2,
        i32::from(config.arena.height) / 2,
    );
    let mut sim = Simulation::new(config)?;
    sim.seed_genome(genome, center)?;
    let ran = sim.run(ticks);
    tracing::info!(seed, ran, population = sim.queue().len(), "seed finished");
    Ok(SeedOutcome {
        seed,
        digest: sim.digest(),
        stats: sim.stats(),
        top_lineages: sim
            .queue()
            .lineages()
            .get_top_lineages(TOP_LINEAGES)
            .into_iter()
            .cloned()
            .collect(),
    })
}

fn main() -> anyhow::Result<()> {
    init_logging("warn");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => mycora_io::load_config(path, false)?,
        None => AppConfig::default(),
    };
    let genome = mycora_io::load_genome(&args.genome)?.into_rows();

    println!("Verifying Mycora determinism...");
    let first = run_seed(&config, &genome, args.base_seed, args.ticks)?;
    let second = run_seed(&config, &genome, args.base_seed, args.ticks)?;
    if first.digest != second.digest {
        println!("\n❌ REPLAY DIVERGED!");
        println!("Run 1: {}", first.digest);
        println!("Run 2: {}", second.digest);
        anyhow::bail!("seed {} did not replay identically", args.base_seed);
    }
    println!("✅ Replay identical after {} ticks: {}", args.ticks, first.digest);

    println!("\nRunning {} seeds in parallel...", args.seeds);
    let outcomes: Vec<SeedOutcome> = (args.base_seed..args.base_seed + args.seeds)
        .into_par_iter()
        .map(|seed| run_seed(&config, &genome, seed, args.ticks))
        .collect::<anyhow::Result<_>>()?;

    println!(
        "{:>6} {:>10} {:>9} {:>8} {:>8} {:>6} {:>8}",
        "seed", "population", "occupancy", "births", "evicted", "gen", "top line"
    );
    for o in &outcomes {
        let top = o
            .top_lineages
            .first()
            .map_or_else(|| "-".to_string(), |l| format!("{}:{}", l.founder, l.total_produced));
        println!(
            "{:>6} {:>10} {:>9.3} {:>8} {:>8} {:>6} {:>8}",
            o.seed,
            o.stats.population,
            o.stats.occupancy,
            o.stats.births,
            o.stats.evictions,
            o.stats.max_generation,
            top
        );
    }
    let survived = outcomes.iter().filter(|o| o.stats.population > 0).count();
    println!("\n{survived}/{} seeds still alive at tick {}", outcomes.len(), args.ticks);

    if let Some(path) = &args.output {
        mycora_io::write_json_file(&outcomes, path)?;
        println!("Results written to {path}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::parse_from(["verify"]);
        assert_eq!(args.genome, "genomes/initial.gen");
        assert_eq!(args.ticks, 2000);
        assert_eq!(args.seeds, 8);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_parsing_custom() {
        let args = Args::parse_from(["verify", "-g", "my.gen", "-t", "50", "-s", "3", "--base-seed", "9"]);
        assert_eq!(args.genome, "my.gen");
        assert_eq!(args.ticks, 50);
        assert_eq!(args.seeds, 3);
        assert_eq!(args.base_seed, 9);
    }

    #[test]
    fn test_run_seed_is_deterministic() {
        let mut config = AppConfig::default();
        config.arena.width = 40;
        config.arena.height = 20;
        let genome = vec!["@C$".chars().collect::<Vec<_>>()];
        let a = run_seed(&config, &genome, 5, 100).unwrap();
        let b = run_seed(&config, &genome, 5, 100).unwrap();
        assert_eq!(a.digest, b.digest);
        assert!(a.stats.births > 1);
        assert_eq!(a.top_lineages.len(), 1);
        assert_eq!(a.top_lineages[0].founder, mycora_data::OrganismId(1));
        assert_eq!(a.top_lineages[0].total_produced as u64, a.stats.births);
    }
}
