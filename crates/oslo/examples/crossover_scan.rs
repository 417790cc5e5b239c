//! Crossover time across system sizes.
//!
//! Runs a few independent piles per size, then compares the observed
//! crossover time with the analytic estimate (<z>/2) L² (1 + 1/L).
//!
//! Run with: cargo run --example crossover_scan

use oslo::{SimulationConfig, StopPolicy, run_batch};

const SIZES: [usize; 5] = [8, 16, 32, 64, 128];
const REPEATS: usize = 4;

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║   Oslo Model Crossover Scan                    ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let template = SimulationConfig::default().with_stop(StopPolicy::after_crossover(2_000));
    let runs = match run_batch(&SIZES, REPEATS, &template, 42) {
        Ok(runs) => runs,
        Err(err) => {
            eprintln!("batch failed: {err}");
            return;
        }
    };

    println!("{:>6} {:>12} {:>12} {:>10}", "L", "t_c", "theory", "<h>");
    for size in SIZES {
        let outputs = oslo::batch::runs_for_size(&runs, size);
        let n = outputs.len() as f64;

        let t_c = outputs
            .iter()
            .filter_map(|o| o.crossover_time)
            .map(|t| t as f64)
            .sum::<f64>()
            / n;
        let theory = outputs.iter().map(|o| o.crossover_time_theory).sum::<f64>() / n;
        let height = outputs
            .iter()
            .filter_map(|o| o.mean_recurrent_height().ok())
            .sum::<f64>()
            / n;

        println!("{size:>6} {t_c:>12.1} {theory:>12.1} {height:>10.2}");
    }
}
