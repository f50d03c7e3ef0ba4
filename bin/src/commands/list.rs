//! List command implementation.

use anyhow::Result;
use brickline_lib::prelude::*;

/// List supported instruments, optionally filtered by a search pattern.
pub(crate) fn list_instruments(search: Option<&str>) -> Result<()> {
    let registry = InstrumentRegistry::global();

    let mut instruments: Vec<_> = match search {
        Some(pattern) => registry.search(pattern),
        None => registry.all().collect(),
    };
    instruments.sort_unstable_by(|a, b| a.symbol().cmp(b.symbol()));

    if instruments.is_empty() {
        println!("No instruments found.");
        return Ok(());
    }

    println!("{:<12} {:<20} {:>8} {:>10}", "SYMBOL", "NAME", "DECIMALS", "TICK");
    println!("{}", "-".repeat(53));

    for instrument in &instruments {
        println!(
            "{:<12} {:<20} {:>8} {:>10}",
            instrument.symbol(),
            instrument.name(),
            instrument.price_decimals(),
            instrument.tick_size().to_string()
        );
    }

    println!("\nTotal: {} instruments", instruments.len());
    Ok(())
}
