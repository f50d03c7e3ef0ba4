//! Info command implementation.
//!
//! Shows an instrument's price precision and what each block preset means
//! for it in price ticks.

use anyhow::{Context, Result};
use brickline_lib::prelude::*;

/// Show detailed information about an instrument.
pub(crate) fn show_info(symbol: &str) -> Result<()> {
    let registry = InstrumentRegistry::global();
    let instrument = registry
        .get(symbol)
        .with_context(|| format!("Unknown instrument: {symbol}"))?;

    println!("Instrument: {}", instrument.name());
    println!("Symbol:     {}", instrument.symbol());
    println!("Decimals:   {}", instrument.price_decimals());
    println!("Tick size:  {}", instrument.tick_size());

    println!("\nBlock Presets:");
    println!("{:<12} {:>10} {:>14} {:>14}", "PRESET", "SIZE", "REVERSAL", "TICKS/BLOCK");
    println!("{}", "-".repeat(53));

    for preset in BlockPreset::all() {
        let size = preset.block_size();
        let ticks = size
            .get()
            .checked_div(instrument.tick_size())
            .map_or_else(|| "-".to_string(), |t| t.normalize().to_string());
        println!(
            "{:<12} {:>10} {:>14} {:>14}",
            preset.as_str(),
            size.to_string(),
            size.reversal_threshold().to_string(),
            ticks
        );
    }

    Ok(())
}
