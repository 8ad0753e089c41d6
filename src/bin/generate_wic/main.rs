use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;

use lexbench::backend::GraphArgs;
use lexbench::config::default_ambiguous_words;
use lexbench::graph::LanguageCode;
use lexbench::task::write_jsonl;
use lexbench::wic::WicGenerator;

/// Builds word-in-context pairs from the glosses of ambiguous words.
#[derive(Parser, Debug)]
#[command()]
struct Args {
  #[command(flatten)]
  graph: GraphArgs,

  #[arg(long, default_value = "EN")]
  lang1: String,

  #[arg(long, default_value = "DE")]
  lang2: String,

  /// Ambiguous words; defaults to the built-in list
  #[arg(long = "word")]
  words: Vec<String>,

  #[arg(short, long, default_value = "wic_benchmark.jsonl")]
  output: PathBuf,
}

fn main() -> anyhow::Result<()> {
  lexbench::logging::init();
  let args = Args::parse();

  let words = if args.words.is_empty() { default_ambiguous_words() } else { args.words.clone() };

  let graph = args.graph.open()?;
  let mut rng = args.graph.rng();

  let generator = WicGenerator::new(&*graph, LanguageCode::new(&args.lang1), LanguageCode::new(&args.lang2));
  let tasks = generator.generate(&mut rng, &words);

  write_jsonl(&args.output, &tasks).with_context(|| format!("failed to write {}", args.output.display()))?;

  println!("");
  println!("{}", style("--- DONE ---").bold());
  println!("Generated {} examples. Saved to {}", style(tasks.len()).green(), args.output.display());
  Ok(())
}
