use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde_json::json;
use tarifa_codec::{export_without_temp, read_path, write_path, DEFAULT_SHEET_NAME};
use tarifa_diff::{Comparison, RowMatch};
use tarifa_store::{GridStore, JsonFileStore, Table};
use tarifa_transform::{TransformOutput, TransformPipeline};
use tarifa_types::{cell_at, Grid};
use tarifa_worker::{ComparisonReply, ComparisonRequest, ComparisonWorker};
use tracing::debug;

use crate::cli::*;
use crate::config::AppConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref(), cli.store.as_deref())?;
    let format = cli.format;
    debug!(store = %config.store_dir.display(), "configuration loaded");
    match cli.command {
        Command::Load(args) => cmd_load(&config, format, args),
        Command::Apply => cmd_apply(&config, format),
        Command::Transform(args) => cmd_transform(&config, format, args),
        Command::Diff(args) => cmd_diff(&config, format, args).await,
        Command::DiffStored => cmd_diff_stored(&config, format).await,
        Command::Export(args) => cmd_export(format, args),
        Command::Show(args) => cmd_show(&config, format, args),
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<JsonFileStore> {
    JsonFileStore::open(&config.store_dir)
        .with_context(|| format!("opening store {}", config.store_dir.display()))
}

fn read_grid(path: &Path) -> anyhow::Result<Grid> {
    read_path(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// load / apply / show
// ---------------------------------------------------------------------------

fn cmd_load(config: &AppConfig, format: OutputFormat, args: LoadArgs) -> anyhow::Result<()> {
    let grid = read_grid(&args.file)?;
    let table = Table::from(args.table);
    let id = open_store(config)?.replace(table, &grid)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "table": table,
            "record": id,
            "rows": grid.data_len(),
        })),
        OutputFormat::Text => {
            println!(
                "{} Loaded {} rows into {} (record {})",
                "✓".green().bold(),
                grid.data_len().to_string().bold(),
                table.to_string().yellow(),
                id.to_string().dimmed()
            );
            Ok(())
        }
    }
}

fn cmd_apply(config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let grid = store
        .latest(Table::New)?
        .ok_or_else(|| anyhow!("{} is empty; load a new price list first", Table::New))?;
    let output = TransformPipeline::with_default_stages(config.transform.clone()).run(&grid);
    let id = store.replace(Table::New, &output.grid)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "table": Table::New,
            "record": id,
            "rows": output.grid.data_len(),
            "stages": stage_summaries(&output),
        })),
        OutputFormat::Text => {
            print_report(&output);
            println!(
                "{} Stored transformed list in {} (record {})",
                "✓".green().bold(),
                Table::New.to_string().yellow(),
                id.to_string().dimmed()
            );
            Ok(())
        }
    }
}

fn cmd_show(config: &AppConfig, format: OutputFormat, args: ShowArgs) -> anyhow::Result<()> {
    let table = Table::from(args.table);
    let records = open_store(config)?.read_all(table)?;
    let Some(latest) = records.last() else {
        println!("{} is empty.", table.to_string().yellow());
        return Ok(());
    };
    match format {
        OutputFormat::Json => print_json(latest),
        OutputFormat::Text => {
            println!(
                "{}: {} record(s), latest {} inserted {}",
                table.to_string().yellow().bold(),
                records.len(),
                latest.id.to_string().bold(),
                latest.inserted_at.to_rfc3339().dimmed()
            );
            for row in latest.data.rows().iter().take(args.limit) {
                let cells: Vec<String> = row.iter().map(|c| c.render()).collect();
                println!("  {}", cells.join("\t"));
            }
            if latest.data.len() > args.limit {
                println!("  {} more rows", (latest.data.len() - args.limit).to_string().dimmed());
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// transform / export
// ---------------------------------------------------------------------------

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    input.with_file_name(format!("{stem}.transformed.xlsx"))
}

fn stage_summaries(output: &TransformOutput) -> Vec<serde_json::Value> {
    output
        .report
        .stage_results
        .iter()
        .map(|s| {
            json!({
                "stage": s.stage_name,
                "rows_in": s.rows_in,
                "rows_out": s.rows_out,
                "elapsed_us": s.elapsed.as_micros() as u64,
            })
        })
        .collect()
}

fn print_report(output: &TransformOutput) {
    for stage in &output.report.stage_results {
        println!(
            "  {:<22} {:>5} -> {:<5} {}",
            stage.stage_name,
            stage.rows_in,
            stage.rows_out,
            format!("{:?}", stage.elapsed).dimmed()
        );
    }
}

fn cmd_transform(config: &AppConfig, format: OutputFormat, args: TransformArgs) -> anyhow::Result<()> {
    let grid = read_grid(&args.file)?;
    let output = TransformPipeline::with_default_stages(config.transform.clone()).run(&grid);
    let target = args.output.unwrap_or_else(|| default_output(&args.file));
    write_path(&output.grid, DEFAULT_SHEET_NAME, &target)
        .with_context(|| format!("writing {}", target.display()))?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "output": target,
            "rows": output.grid.data_len(),
            "stages": stage_summaries(&output),
        })),
        OutputFormat::Text => {
            print_report(&output);
            println!(
                "{} Wrote {} rows to {}",
                "✓".green().bold(),
                output.grid.data_len().to_string().bold(),
                target.display().to_string().cyan()
            );
            Ok(())
        }
    }
}

fn cmd_export(format: OutputFormat, args: ExportArgs) -> anyhow::Result<()> {
    let grid = export_without_temp(&read_grid(&args.file)?);
    write_path(&grid, DEFAULT_SHEET_NAME, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "output": args.output,
            "columns": grid.width(),
            "rows": grid.data_len(),
        })),
        OutputFormat::Text => {
            println!(
                "{} Exported {} rows to {}",
                "✓".green().bold(),
                grid.data_len().to_string().bold(),
                args.output.display().to_string().cyan()
            );
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

async fn cmd_diff(config: &AppConfig, format: OutputFormat, args: DiffArgs) -> anyhow::Result<()> {
    let base = read_grid(&args.base)?;
    let raw_new = read_grid(&args.new)?;
    let new = if args.raw_new {
        raw_new
    } else {
        TransformPipeline::with_default_stages(config.transform.clone())
            .run(&raw_new)
            .grid
    };
    run_comparison(config, format, ComparisonRequest::new(base, new)).await
}

async fn cmd_diff_stored(config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let base = store
        .latest(Table::Base)?
        .ok_or_else(|| anyhow!("{} is empty; load a base price list first", Table::Base))?;
    let new = store
        .latest(Table::New)?
        .ok_or_else(|| anyhow!("{} is empty; load a new price list first", Table::New))?;
    run_comparison(config, format, ComparisonRequest::new(base, new)).await
}

async fn run_comparison(
    config: &AppConfig,
    format: OutputFormat,
    request: ComparisonRequest,
) -> anyhow::Result<()> {
    let worker = ComparisonWorker::new(config.worker.clone(), config.diff.clone());
    let result = worker.submit(request).await;
    match format {
        OutputFormat::Json => {
            let reply = ComparisonReply::from(result);
            print_json(&reply)?;
            match reply {
                ComparisonReply::Done { .. } => Ok(()),
                ComparisonReply::Failed { error } => bail!(error),
            }
        }
        OutputFormat::Text => {
            print_comparison(&result?);
            Ok(())
        }
    }
}

fn print_comparison(comparison: &Comparison) {
    let summary = comparison.summary();
    println!(
        "Rows: {} full key, {} fallback, {} without reference, {} unkeyable",
        summary.full_key.to_string().green(),
        summary.fallback_key.to_string().yellow(),
        summary.unmatched.to_string().red(),
        summary.unkeyable.to_string().dimmed()
    );
    if comparison.differences.is_empty() {
        println!("{} No differences.", "✓".green().bold());
        return;
    }
    println!("{} differing cells:", comparison.differences.len().to_string().bold());
    let rows = comparison.display_data.data_rows();
    for coord in &comparison.differences {
        let Some(row) = rows.get(coord.row) else {
            continue;
        };
        let status = match comparison.matches.get(coord.row) {
            Some(RowMatch::FallbackKey) => " (fallback)".yellow(),
            Some(RowMatch::Unmatched) => " (no reference)".red(),
            _ => "".normal(),
        };
        println!(
            "  {:<8} {:<40} {}{}",
            coord.to_string().bold(),
            cell_at(row, 2).render(),
            cell_at(row, coord.col).render().cyan(),
            status
        );
    }
}
