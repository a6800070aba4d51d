//! Actuarial Calc CLI
//!
//! Builds one calc per starting age from a mortality table, populates the
//! requested columns and writes them as CSV or JSON.

use actuarial_calc::{Calc, CalcConfig, CsvMortalityTable, MortalityTable, Series, TableSpec};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "actuarial_calc", about = "Populate actuarial columns for one or more starting ages.")]
struct Args {
    /// Mortality table CSV file.
    #[arg(long, value_name = "PATH", required_unless_present = "list")]
    table: Option<PathBuf>,

    /// JSON description of the table's age column, value columns and layout.
    #[arg(long, value_name = "PATH", required_unless_present = "list")]
    table_spec: Option<PathBuf>,

    /// Starting age (repeatable). Each age gets its own calc.
    #[arg(long = "age", required_unless_present = "list")]
    ages: Vec<u32>,

    /// Use ultimate rather than select mortality.
    #[arg(long)]
    ultimate: bool,

    /// Interest rate per period.
    #[arg(long, default_value_t = 0.04)]
    rate: f64,

    /// Term in periods, available to formulas as `n1`.
    #[arg(long)]
    term: Option<u32>,

    /// Column to populate, e.g. `a_due(x1)[n1]` (repeatable).
    #[arg(long = "column", required_unless_present = "list")]
    columns: Vec<String>,

    /// JSON calc configuration (radix).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// List the available column templates and exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct ColumnOutput {
    name: String,
    values: Series,
}

#[derive(Debug, Serialize)]
struct AgeOutput {
    age: u32,
    columns: Vec<ColumnOutput>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        let calc = Calc::new();
        for (template, description) in calc.formulae() {
            println!("{:<30} {}", template, description);
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => CalcConfig::from_json_path(path)
            .map_err(|e| anyhow!("failed to read config {}: {}", path.display(), e))?,
        None => CalcConfig::default(),
    };

    let spec_path = args.table_spec.as_ref().context("--table-spec is required")?;
    let spec = TableSpec::from_json_path(spec_path)
        .with_context(|| format!("failed to read table spec {}", spec_path.display()))?;

    let table_path = args.table.as_ref().context("--table is required")?;
    let table = CsvMortalityTable::from_path(table_path, spec)
        .with_context(|| format!("failed to load mortality table {}", table_path.display()))?;

    let start = Instant::now();
    let outputs: Vec<AgeOutput> = args
        .ages
        .par_iter()
        .map(|&age| evaluate(age, &table, &args, &config))
        .collect::<Result<Vec<_>>>()?;
    info!("populated {} ages in {:?}", outputs.len(), start.elapsed());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Csv => write_csv(&mut out, &args.columns, &outputs)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &outputs)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Build and populate the calc for one starting age
fn evaluate(age: u32, table: &CsvMortalityTable, args: &Args, config: &CalcConfig) -> Result<AgeOutput> {
    let qx = table.qx(age, !args.ultimate)?;

    let mut calc = Calc::new().with_config(config.clone());
    calc.add_life(age, &qx)
        .with_context(|| format!("failed to add life aged {}", age))?;
    calc.add_i(args.rate)?;
    if let Some(n) = args.term {
        calc.add_term(n)?;
    }

    let names = calc
        .populate_all(args.columns.as_slice(), false)
        .with_context(|| format!("failed to populate columns for age {}", age))?;

    let columns = names
        .into_iter()
        .map(|name| {
            let values = calc.column(&name)?.clone();
            Ok(ColumnOutput { name, values })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AgeOutput { age, columns })
}

/// One row per age and period: `age,t,<columns...>`, nulls left empty
fn write_csv<W: Write>(out: W, names: &[String], outputs: &[AgeOutput]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["age".to_string(), "t".to_string()];
    header.extend(names.iter().cloned());
    writer.write_record(&header)?;

    for output in outputs {
        let rows = output.columns.first().map_or(0, |c| c.values.len());
        for t in 0..rows {
            let mut record = vec![output.age.to_string(), t.to_string()];
            record.extend(
                output
                    .columns
                    .iter()
                    .map(|c| c.values.get(t).map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }
    }

    writer.flush()?;
    Ok(())
}
