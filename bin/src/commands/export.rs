//! Export command implementation.

use anyhow::{Context, Result, bail};
use brickline_lib::prelude::*;
use brickline_lib::load_history;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::display::{Format, SinkArg, write_records};

/// Converts a block file written by `replay` into any batch output format.
pub(crate) async fn export(
    input: &Path,
    input_format: Option<SinkArg>,
    output: Option<PathBuf>,
    format: Format,
    limit: Option<usize>,
) -> Result<()> {
    if !input.is_file() {
        bail!("Input file not found: {}", input.display());
    }
    let input_format = match input_format {
        Some(arg) => SinkFormat::from(arg),
        None => SinkFormat::from_path(input).with_context(|| {
            format!(
                "Cannot infer the format of {}; pass --input-format",
                input.display()
            )
        })?,
    };
    let output = output.unwrap_or_else(|| input.with_extension(format.extension()));
    if output == input {
        bail!("Output would overwrite the input file: {}", output.display());
    }

    let records = load_history(input, input_format, limit.unwrap_or(usize::MAX))
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    write_records(&records, &output, format)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        records = records.len(),
        "exported blocks"
    );
    println!("Wrote {} blocks to {}", records.len(), output.display());
    Ok(())
}
