//! Prints engine throughput for each block preset as a markdown table.
//!
//! Run with: `cargo run --release --bin benchmark_table [ticks]`

use brickline_bench::{random_walk, replay};
use brickline_lib::prelude::*;
use rust_decimal::Decimal;

fn main() {
    let n = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1_000_000);

    println!("Generating {n} synthetic trades...");
    let ticks = random_walk(n, 42, Decimal::from(43_000));

    println!();
    println!("| Preset | Block size | Blocks | Time (ms) | Ticks/sec |");
    println!("|--------|-----------:|-------:|----------:|----------:|");

    for preset in BlockPreset::all() {
        let result = match replay(&ticks, preset.block_size(), 100) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("{preset}: {e}");
                continue;
            }
        };
        println!(
            "| {} | {} | {} | {} | {:.0} |",
            preset,
            result.block_size,
            result.blocks,
            result.duration.as_millis(),
            result.ticks_per_sec()
        );
    }
}
