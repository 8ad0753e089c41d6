use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use console::style;
use float_ord::FloatOrd;

use lexbench::charts;
use lexbench::results::{parse_results_dir, write_master_csv, ParseMode};

/// Collects evaluation score files into a master table and draws charts.
#[derive(Parser, Debug)]
#[command()]
struct Args {
  /// Directory searched recursively for *.json score files
  results_dir: PathBuf,

  /// Split results by part of speech (files must name nouns/verbs/adjs)
  #[arg(long)]
  fine_grained: bool,

  #[arg(long, default_value = ".")]
  out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
  lexbench::logging::init();
  let args = Args::parse();

  let mode = if args.fine_grained { ParseMode::FineGrained } else { ParseMode::Coarse };
  let records = parse_results_dir(&args.results_dir, mode)?;
  if records.is_empty() {
    println!("Warning: No result files were found or parsed. Please check your results directory and filenames.");
    return Ok(());
  }

  println!("Successfully parsed {} result files:", records.len());
  for r in &records {
    let pos = r.pos.map(|p| p.label()).unwrap_or("-");
    println!("  {:<30} {:<16} {:<10} {:>6.1}% {:>6}", r.model, r.tier.label(), pos, r.accuracy * 100.0, r.samples);
  }
  if let Some(best) = records.iter().max_by_key(|r| FloatOrd(r.accuracy)) {
    println!("Best: {} on {} ({:.1}%)", style(&best.model).green(), best.tier.label(), best.accuracy * 100.0);
  }

  std::fs::create_dir_all(&args.out_dir).with_context(|| format!("failed to create {}", args.out_dir.display()))?;

  let csv_name = match mode {
    ParseMode::Coarse => "master_results.csv",
    ParseMode::FineGrained => "master_results_fine_grained.csv",
  };
  let csv_path = args.out_dir.join(csv_name);
  write_master_csv(&records, &csv_path, mode)?;
  println!("Master results table saved to {}", csv_path.display());

  let drawn = match mode {
    ParseMode::Coarse => vec![
      draw(&args.out_dir, "performance_by_tier.svg", |p| charts::performance_by_tier(&records, p)),
      draw(&args.out_dir, "dataset_size.svg", |p| charts::dataset_size(&records, p)),
    ],
    ParseMode::FineGrained => vec![
      draw(&args.out_dir, "fine_grained_performance.svg", |p| charts::fine_grained_performance(&records, p)),
    ],
  };
  println!("{} chart(s) written to {}", style(drawn.iter().filter(|ok| **ok).count()).green(), args.out_dir.display());
  Ok(())
}

fn draw<F: FnOnce(&Path) -> Result<(), charts::ChartError>>(dir: &Path, file_name: &str, render: F) -> bool {
  let path = dir.join(file_name);
  match render(&path) {
    Ok(()) => {
      println!("Chart saved to {}", path.display());
      true
    },
    Err(e) => {
      println!("Cannot generate {}: {}", file_name, e);
      false
    }
  }
}
