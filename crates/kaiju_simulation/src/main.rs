//! Headless симуляция боя кайдзю
//!
//! Использование: kaiju_simulation [tuning.toml] [--bosses N]

use std::path::PathBuf;

use clap::Parser;
use kaiju_simulation::{
    create_headless_app_with, log_error, log_info, spawn_arena_scene, Health, MatchResult, Tuning,
};

const MAX_TICKS: usize = 60 * 60 * 3; // 3 минуты при 60Hz

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML файл тюнинга (без него: дефолтный тюнинг)
    tuning: Option<PathBuf>,

    /// Сколько боссов на арене (2+ → formation)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    bosses: u16,
}

fn main() {
    let args = Args::parse();
    kaiju_simulation::init_logger();

    let tuning = match args.tuning {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|error| error.to_string())
            .and_then(|source| Tuning::from_toml_str(&source).map_err(|error| error.to_string()))
        {
            Ok(tuning) => tuning,
            Err(error) => {
                log_error(&format!("Cannot load tuning from {}: {}", path.display(), error));
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let boss_count = usize::from(args.bosses);

    log_info(&format!(
        "Starting kaiju simulation (seed: {}, bosses: {})",
        tuning.simulation.seed, boss_count
    ));

    let mut app = create_headless_app_with(tuning.clone());
    let scene = spawn_arena_scene(&mut app.world_mut().commands(), &tuning, boss_count);
    app.world_mut().flush();

    for tick in 0..MAX_TICKS {
        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            let player_health = scene
                .player
                .and_then(|player| world.get::<Health>(player))
                .map_or(0.0, |health| health.current);
            let boss_health: Vec<f32> = scene
                .bosses
                .iter()
                .map(|boss| world.get::<Health>(*boss).map_or(0.0, |health| health.current))
                .collect();
            log_info(&format!(
                "Tick {}: {} entities, player HP {:.1}, bosses HP {:?}",
                tick,
                world.entities().len(),
                player_health,
                boss_health
            ));
        }

        if let Some(outcome) = app.world().resource::<MatchResult>().0 {
            log_info(&format!("Match over at tick {}: {:?}", tick, outcome));
            return;
        }
    }

    log_info("Simulation complete (time limit)");
}
