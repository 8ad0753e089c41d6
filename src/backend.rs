use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::babelnet::{ApiConfig, ApiGraph};
use crate::graph::*;
use crate::pacing::{FixedDelay, NoPacing, Paced};
use crate::snapshot::SnapshotGraph;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum Backend {
  /// The remote BabelNet HTTP API.
  Api,
  /// A local JSON snapshot of the graph.
  Snapshot,
}

/// Graph client selection shared by the generator binaries.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
  #[arg(long, value_enum, default_value = "api")]
  pub backend: Backend,

  /// Snapshot file for `--backend snapshot`
  #[arg(long)]
  pub snapshot: Option<PathBuf>,

  #[arg(long, env = "BABELNET_API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,

  #[arg(long, env = "BABELNET_API_URL")]
  pub api_url: Option<String>,

  #[arg(long, default_value_t = 30)]
  pub timeout_secs: u64,

  /// Pause before every API call, in milliseconds
  #[arg(long, default_value_t = 500)]
  pub delay_ms: u64,

  /// Seed for reproducible sampling and shuffling
  #[arg(long)]
  pub seed: Option<u64>,
}

impl GraphArgs {
  pub fn open(&self) -> anyhow::Result<Box<dyn LexicalGraph>> {
    match self.backend {
      Backend::Api => {
        let mut config = ApiConfig::from_env();
        if self.api_key.is_some() {
          config.api_key = self.api_key.clone();
        }
        if let Some(url) = &self.api_url {
          config.base_url = url.clone();
        }
        config.timeout = Duration::from_secs(self.timeout_secs);

        info!(url = %config.base_url, delay_ms = self.delay_ms, "using BabelNet API");
        let graph = ApiGraph::new(config)?;
        if self.delay_ms > 0 {
          Ok(Box::new(Paced::new(graph, FixedDelay::from_millis(self.delay_ms))))
        }
        else {
          Ok(Box::new(Paced::new(graph, NoPacing)))
        }
      },
      Backend::Snapshot => {
        let path = self.snapshot.as_ref()
          .ok_or_else(|| anyhow::anyhow!("--snapshot is required with --backend snapshot"))?;
        let graph = SnapshotGraph::load(path)
          .map_err(|e| anyhow::anyhow!("failed to load snapshot {}: {}", path.display(), e))?;
        info!(path = %path.display(), synsets = graph.len(), "using local snapshot");
        Ok(Box::new(graph))
      }
    }
  }

  pub fn rng(&self) -> SmallRng {
    match self.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_entropy(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;
  use std::io::Write;

  #[derive(Parser)]
  struct TestCli {
    #[command(flatten)]
    graph: GraphArgs,
  }

  #[test]
  fn test_snapshot_backend() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"synsets": [{{"id": "bn:1", "pos": "NOUN", "senses": {{"EN": ["sun"], "DE": ["Sonne"]}}}}]}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let cli = TestCli::parse_from(["test", "--backend", "snapshot", "--snapshot", &path, "--seed", "4"]);
    assert_eq!(cli.graph.seed, Some(4));
    let graph = cli.graph.open().unwrap();
    let senses = graph.find_senses("sun", PartOfSpeech::Noun, &LanguageCode::new("EN")).unwrap();
    assert_eq!(graph.resolve(&senses[0], &LanguageCode::new("DE")).unwrap(), Some("Sonne".to_owned()));
  }

  #[test]
  fn test_snapshot_backend_needs_path() {
    let cli = TestCli::parse_from(["test", "--backend", "snapshot"]);
    assert!(cli.graph.open().is_err());
  }
}
