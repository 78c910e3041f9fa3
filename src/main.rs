use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use geohunt::persist::{self, LoadStatus};
use geohunt::state::GameEvent;
use geohunt::GeoPoint;

#[derive(Parser, Debug)]
#[command(name = "geohunt")]
#[command(about = "Simulate a GPS exploration session against a save file")]
struct Args {
    /// Path to the save file
    #[arg(long, default_value = "game_data.json")]
    save: PathBuf,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting latitude in degrees
    #[arg(long, default_value = "48.8566")]
    lat: f64,

    /// Starting longitude in degrees
    #[arg(long, default_value = "2.3522")]
    lng: f64,

    /// Number of simulated location updates
    #[arg(short = 'n', long, default_value = "50")]
    steps: usize,

    /// Average step length in meters
    #[arg(long, default_value = "150.0")]
    step_m: f64,

    /// Reset all progress and delete the save file, then exit
    #[arg(long)]
    reset: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    if args.reset {
        let (mut state, _) = persist::load_game(&args.save);
        state.reset();
        persist::delete_save(&args.save)?;
        println!("Progress reset, save file removed");
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    println!("Simulating walk with seed: {}", seed);

    let (mut state, status) = persist::load_game(&args.save);
    match status {
        LoadStatus::Loaded => println!(
            "Resumed session: {} cells explored, {} active pieces, {} collected",
            state.ledger.cell_count(),
            state.pieces.len(),
            state.collected_count
        ),
        LoadStatus::NoSave => println!("No save found, starting fresh"),
        LoadStatus::Failed => println!("Save file was corrupt, starting fresh"),
    }

    // Resume from the last recorded position when there is one.
    let mut position = state
        .ledger
        .positions()
        .last()
        .copied()
        .unwrap_or(GeoPoint::new(args.lat, args.lng));

    // A fresh board gets its initial batch of pieces.
    if state.pieces.is_empty() && state.ledger.cell_count() == 0 {
        let spawned = state.spawn_initial_batch(position, &mut rng);
        println!("Spawned initial batch of {} piece(s)", spawned);
        persist::save_game(&state, &args.save)?;
    }

    for step in 0..args.steps {
        let distance = args.step_m * (0.5 + rng.gen::<f64>());
        let bearing = rng.gen::<f64>() * std::f64::consts::TAU;
        position = position.offset_polar(distance, bearing);

        let outcome = state.record_location(position, &mut rng);

        for event in state.drain_events() {
            match event {
                GameEvent::CellDiscovered { cell, .. } => {
                    println!(
                        "[{:>4}] Discovered cell {} ({} km² total, {:.10}% of Earth)",
                        step,
                        cell,
                        state.ledger.surface_km2(),
                        state.ledger.surface_fraction() * 100.0
                    );
                }
                GameEvent::PiecePlaced { position } => {
                    println!("[{:>4}] New piece at {}", step, position);
                }
                GameEvent::PieceRemoved { .. } => {
                    println!(
                        "[{:>4}] Collected a piece! Total collected: {}",
                        step, state.collected_count
                    );
                }
                GameEvent::ColorChanged { .. } => {}
            }
        }

        if outcome.changed_durable_state() {
            persist::save_game(&state, &args.save)?;
        }
    }

    println!(
        "Done: {} cells ({} km²), {} active pieces, {} collected",
        state.ledger.cell_count(),
        state.ledger.surface_km2(),
        state.pieces.len(),
        state.collected_count
    );

    Ok(())
}
