//! Profiling tool comparing serial and parallel level selection

use std::time::Instant;

use cave_generator::excavation::{excavate, ExcavationParams, LevelPreset};
use cave_generator::pathfinding::solve;
use cave_generator::seeds;
use cave_generator::selection;

fn main() {
    let seed = 1337u64;
    let candidates = 200;

    println!("=== Performance Profiling ===");
    println!("Candidates per run: {}", candidates);
    println!();

    for preset in LevelPreset::all() {
        let params = ExcavationParams::from_preset(*preset);
        println!(
            "Preset {} ({}x{}, budget {}):",
            preset, params.width, params.height, params.removal_budget
        );

        // Single excavation and solve
        let mut rng = seeds::master_rng(seed);
        let start = Instant::now();
        let candidate = match excavate(&params, &mut rng) {
            Ok(c) => c,
            Err(e) => {
                println!("  skipped: {}", e);
                continue;
            }
        };
        let excavate_time = start.elapsed();

        let start = Instant::now();
        let path = solve(&candidate.grid, candidate.start, candidate.end);
        let solve_time = start.elapsed();
        println!("  Excavation: {:?}", excavate_time);
        println!(
            "  Solve:      {:?} (length {})",
            solve_time,
            path.map(|p| p.len()).unwrap_or(0)
        );

        // Full selection, serial
        let mut rng = seeds::master_rng(seed);
        let start = Instant::now();
        let serial = selection::select_best_scored(candidates, &params, &mut rng);
        let serial_time = start.elapsed();

        // Full selection, parallel
        let start = Instant::now();
        let parallel = selection::select_best_parallel(candidates, &params, seed);
        let parallel_time = start.elapsed();

        match (serial, parallel) {
            (Ok(s), Ok(p)) => {
                println!("  Serial:     {:?} (best {})", serial_time, s.best.score());
                println!("  Parallel:   {:?} (best {})", parallel_time, p.best.score());
                println!(
                    "  Speedup:    {:.2}x",
                    serial_time.as_secs_f64() / parallel_time.as_secs_f64().max(1e-9)
                );
            }
            (Err(e), _) | (_, Err(e)) => println!("  selection failed: {}", e),
        }
        println!();
    }
}
