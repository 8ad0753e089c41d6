use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use lexbench::assembler::{Assembler, TaskFormat};
use lexbench::backend::GraphArgs;
use lexbench::config::{SeedList, TargetLanguage};
use lexbench::graph::LanguageCode;
use lexbench::task::write_jsonl;

/// Builds a cross-lingual synonym benchmark: for each seed word and target
/// language, pick the translation out of four choices.
#[derive(Parser, Debug)]
#[command()]
struct Args {
  #[command(flatten)]
  graph: GraphArgs,

  /// Target languages as CODE:Name
  #[arg(long = "lang", default_values = ["DE:German", "FR:French"])]
  languages: Vec<String>,

  #[arg(long, default_value = "EN")]
  source_lang: String,

  /// JSON list of {"word", "pos"} seed entries
  #[arg(long)]
  seeds: Option<PathBuf>,

  #[arg(long, default_value_t = 5)]
  desired_count: usize,

  #[arg(short, long, default_value = "csi_benchmark.jsonl")]
  output: PathBuf,
}

fn main() -> anyhow::Result<()> {
  lexbench::logging::init();
  let args = Args::parse();

  let languages = args.languages.iter()
    .map(|spec| TargetLanguage::parse(spec))
    .collect::<Result<Vec<_>, _>>()?;
  let seeds = match &args.seeds {
    Some(path) => SeedList::load(path)?,
    None => SeedList::default_seeds(),
  };
  let candidates = seeds.candidates(&LanguageCode::new(&args.source_lang));

  let graph = args.graph.open()?;
  let mut rng = args.graph.rng();

  let mut assembler = Assembler::new(&*graph, &candidates, TaskFormat::csi());
  assembler.desired_count = args.desired_count;
  let tasks = assembler.build_partition(&mut rng, &languages);

  write_jsonl(&args.output, &tasks).with_context(|| format!("failed to write {}", args.output.display()))?;

  println!("");
  println!("{}", style("--- DONE ---").bold());
  println!("Generated {} examples. Saved to {}", style(tasks.len()).green(), args.output.display());
  Ok(())
}
