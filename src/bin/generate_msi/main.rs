use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use lexbench::assembler::{Assembler, TaskFormat};
use lexbench::backend::GraphArgs;
use lexbench::config::{LanguageTiers, SeedList};
use lexbench::graph::LanguageCode;
use lexbench::task::write_jsonl;

/// Builds the synonym benchmark for every language of every resource tier,
/// one output file per tier.
#[derive(Parser, Debug)]
#[command()]
struct Args {
  #[command(flatten)]
  graph: GraphArgs,

  /// JSON table of tier -> [{"code", "name"}]; defaults to the built-in table
  #[arg(long)]
  tiers: Option<PathBuf>,

  #[arg(long, default_value = "EN")]
  source_lang: String,

  /// JSON list of {"word", "pos"} seed entries
  #[arg(long)]
  seeds: Option<PathBuf>,

  #[arg(long, default_value_t = 5)]
  desired_count: usize,

  #[arg(long, default_value = "./data")]
  output_dir: PathBuf,

  #[arg(long, default_value = "msi_benchmark_v2")]
  file_stem: String,
}

fn main() -> anyhow::Result<()> {
  lexbench::logging::init();
  let args = Args::parse();

  let tiers = match &args.tiers {
    Some(path) => LanguageTiers::load(path)?,
    None => LanguageTiers::default_tiers(),
  };
  let seeds = match &args.seeds {
    Some(path) => SeedList::load(path)?,
    None => SeedList::default_seeds(),
  };
  let candidates = seeds.candidates(&LanguageCode::new(&args.source_lang));

  let graph = args.graph.open()?;
  let mut rng = args.graph.rng();

  let mut assembler = Assembler::new(&*graph, &candidates, TaskFormat::msi());
  assembler.desired_count = args.desired_count;

  let mut total = 0;
  for partition in assembler.build_tasks(&mut rng, &tiers) {
    println!("");
    println!("{}", style(format!("--- TIER {} DONE ---", partition.tier.key().to_uppercase())).bold());
    if partition.tasks.is_empty() {
      println!("No examples were generated for this tier.");
      continue;
    }

    let path = args.output_dir.join(partition.file_name(&args.file_stem));
    write_jsonl(&path, &partition.tasks).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Generated {} total examples. Saved to {}", style(partition.tasks.len()).green(), path.display());
    total += partition.tasks.len();
  }

  println!("");
  println!("{}", style(format!("===== ALL TIERS PROCESSED! {} examples =====", total)).bold());
  Ok(())
}
