use anyhow::Result;
use clap::Parser;
use mycora_core::init_logging;
use mycora_data::Extent;
use mycora_lib::app::{App, Command};
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "console")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Founder genome file
    #[arg(short, long, default_value = "genomes/initial.gen")]
    genome: String,

    /// Overrides the configured seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ticks to run in headless mode
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,

    /// Ticks advanced per line while unpaused in console mode
    #[arg(long, default_value_t = 100)]
    burst: u64,

    /// Write a JSON snapshot here on exit
    #[arg(long)]
    snapshot: Option<String>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
enum Mode {
    /// Line-oriented console: one command per line, empty line advances
    Console,
    Headless,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let mut config = mycora_io::load_config(&args.config, true)?;
    if args.seed.is_some() {
        config.clock.seed = args.seed;
    }
    let genome = mycora_io::load_genome(&args.genome)?;
    let mut app = App::new(config, genome.rows())?;

    match args.mode {
        Mode::Headless => {
            println!("Running in HEADLESS mode...");
            let ran = app.sim.run(args.ticks);
            let stats = app.sim.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
            println!(
                "Headless simulation finished after {ran} ticks in {:.2?}.",
                app.sim.metrics().elapsed()
            );
        }
        Mode::Console => console(&mut app, args.burst)?,
    }

    if let Some(path) = &args.snapshot {
        let snapshot = app.sim.snapshot(Some((app.position, app.view)));
        mycora_io::write_json_file(&snapshot, path)?;
        println!("Snapshot written to {path}");
    }
    Ok(())
}

fn console(app: &mut App, burst: u64) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    draw(app, &mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line?;
        match Command::parse(&line) {
            Some(cmd) => app.apply(cmd),
            None if line.trim().is_empty() && !app.paused => app.apply(Command::Run(burst)),
            None if line.trim().is_empty() => app.apply(Command::Tick),
            None => writeln!(stdout, "unknown command: {}", line.trim())?,
        }
        if !app.running {
            break;
        }
        draw(app, &mut stdout)?;
    }
    Ok(())
}

fn draw(app: &App, out: &mut impl Write) -> Result<()> {
    if !app.minimal && app.view != Extent::new(0, 0) {
        write!(out, "{}", app.viewport_text())?;
    }
    writeln!(out, "{}", app.info_text())?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
