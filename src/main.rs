/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # PIXCOL column loader
//!
//! Reads one column of a CSV file into column vectors, writes it through the matching
//! column writer and saves the resulting column chunk.
//!
//! ```text
//! pixcol-cli --input orders.csv --column order_date --type date --output order_date.pxc
//! ```
//!
//! Writer options come from the optional YAML `--config` file and may be overridden by
//! individual flags. Empty CSV fields are stored as nulls.

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use pixcol::ColumnType;
use pixcol::options::ByteOrder;
use pixcol::options::EncodingLevel;
use pixcol::options::WriterOptions;
use pixcol::vector::ColumnVector;
use pixcol::vector::DEFAULT_SIZE;
use pixcol::writer::ColumnEncoding;
use pixcol::writer::ColumnWriter;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(
    name = "pixcol-cli",
    version,
    about = "Write one CSV column as a pixel-chunked column chunk"
)]
struct Args {
    /// CSV file with a header row
    #[arg(long)]
    input: PathBuf,

    /// Header name of the column to load
    #[arg(long)]
    column: String,

    /// long, double, date, timestamp, timestamp(p) or decimal(p,s)
    #[arg(long = "type")]
    column_type: ColumnType,

    #[arg(long)]
    output: PathBuf,

    /// YAML file with writer options
    #[arg(long, env = "PIXCOL_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    pixel_stride: Option<usize>,

    #[arg(long)]
    encoding_level: Option<EncodingLevel>,

    #[arg(long)]
    big_endian: bool,

    #[arg(long)]
    nulls_padding: bool,

    /// Rows per column vector handed to the writer
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    batch_size: usize,

    /// Log and drop rows whose value cannot be parsed instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    column: String,
    column_type: String,
    encoding: ColumnEncoding,
    rows: u64,
    nulls: u64,
    rejected: usize,
    pixels: usize,
    bytes: usize,
    output: PathBuf,
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let args = Args::parse();
    let options = writer_options(&args)?;
    let summary = load_column(&args, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} ({}): {} rows, {} nulls, {} rejected, {} pixels, {} bytes, {:?} encoding -> {}",
            summary.column,
            summary.column_type,
            summary.rows,
            summary.nulls,
            summary.rejected,
            summary.pixels,
            summary.bytes,
            summary.encoding,
            summary.output.display()
        );
    }
    Ok(())
}

/// Options from the config file with command-line overrides applied
fn writer_options(args: &Args) -> Result<WriterOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file {}", path.display()))?;
            serde_yaml::from_reader(file)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => WriterOptions::default(),
    };

    if let Some(pixel_stride) = args.pixel_stride {
        options.pixel_stride = pixel_stride;
    }
    if let Some(encoding_level) = args.encoding_level {
        options.encoding_level = encoding_level;
    }
    if args.big_endian {
        options.byte_order = ByteOrder::Big;
    }
    if args.nulls_padding {
        options.nulls_padding = true;
    }

    options.validate()?;
    debug!(options = ?options, "Resolved writer options");
    Ok(options)
}

fn load_column(args: &Args, options: &WriterOptions) -> Result<Summary> {
    if args.batch_size == 0 {
        anyhow::bail!("Batch size must be greater than zero");
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&args.input)
        .with_context(|| format!("Failed to open CSV file {}", args.input.display()))?;

    let column_index = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .position(|name| name.trim() == args.column)
        .with_context(|| format!("Column '{}' not found in CSV header", args.column))?;

    info!(
        input = %args.input.display(),
        column = %args.column,
        column_type = %args.column_type,
        "Loading column"
    );

    let mut vector = ColumnVector::new(args.column_type, args.batch_size)?;
    let mut writer = ColumnWriter::new(args.column_type, options)?;
    let mut rejected = 0;

    for (row_idx, result) in reader.records().enumerate() {
        // header is line 1
        let row_num = row_idx + 2;
        let record = result.context("Failed to read CSV record")?;
        let value = record.get(column_index).with_context(|| {
            format!("Row {row_num}: expected at least {} columns", column_index + 1)
        })?;

        let added = if value.is_empty() {
            vector.add_null()
        } else {
            vector.add_str(value)
        };
        match added {
            Ok(()) => {}
            Err(e) if e.is_row_error() && args.skip_invalid => {
                warn!(row = row_num, error = %e, "Rejected row");
                rejected += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Row {row_num}, column '{}': invalid value", args.column)
                });
            }
        }

        if vector.len() == args.batch_size {
            writer.write(&vector, vector.len())?;
            vector.reset()?;
        }
    }
    if !vector.is_empty() {
        writer.write(&vector, vector.len())?;
    }
    vector.close();

    writer.close()?;
    let pixels = writer.pixels_written();
    let chunk = writer.finish()?;
    chunk
        .save(&args.output)
        .with_context(|| format!("Failed to write column chunk {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        rows = chunk.meta.row_count,
        rejected,
        "Column chunk written"
    );

    Ok(Summary {
        column: args.column.clone(),
        column_type: args.column_type.to_string(),
        encoding: chunk.meta.encoding,
        rows: chunk.meta.row_count,
        nulls: chunk.meta.statistics.null_count(),
        rejected,
        pixels,
        bytes: chunk.content.len(),
        output: args.output.clone(),
    })
}
