use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ResultsError {
  #[error("bad search pattern: {0}")]
  Pattern(#[from] glob::PatternError),
  #[error("cannot read {path}: {source}")]
  Read { path: PathBuf, source: std::io::Error },
  #[error("cannot parse {path}: {source}")]
  Parse { path: PathBuf, source: serde_json::Error },
  #[error("{path}: missing field {field}")]
  MissingField { path: PathBuf, field: &'static str },
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum TierLabel {
  #[serde(rename = "High-Resource")]
  High,
  #[serde(rename = "Medium-Resource")]
  Medium,
  #[serde(rename = "Low-Resource")]
  Low,
  #[serde(rename = "Unknown")]
  Unknown,
}

impl TierLabel {
  pub fn ordered() -> [TierLabel; 3] {
    [TierLabel::High, TierLabel::Medium, TierLabel::Low]
  }

  pub fn label(&self) -> &'static str {
    match self {
      TierLabel::High => "High-Resource",
      TierLabel::Medium => "Medium-Resource",
      TierLabel::Low => "Low-Resource",
      TierLabel::Unknown => "Unknown",
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PosGroup {
  Nouns,
  Verbs,
  Adjectives,
}

impl PosGroup {
  pub fn ordered() -> [PosGroup; 3] {
    [PosGroup::Nouns, PosGroup::Verbs, PosGroup::Adjectives]
  }

  pub fn label(&self) -> &'static str {
    match self {
      PosGroup::Nouns => "Nouns",
      PosGroup::Verbs => "Verbs",
      PosGroup::Adjectives => "Adjectives",
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseMode {
  /// Every score file, tier `Unknown` when the name does not say.
  Coarse,
  /// Only files whose names give both a tier and a part of speech.
  FineGrained,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ResultRecord {
  pub model: String,
  pub tier: TierLabel,
  pub pos: Option<PosGroup>,
  pub accuracy: f64,
  pub samples: u64,
}

lazy_static! {
  static ref TIER_PREFIX_RE: Regex = Regex::new(r"^(hr|mr|lr)_").unwrap();
  /// Checked in order; the first tier whose marker appears wins.
  static ref TIER_MARKERS: Vec<(TierLabel, Regex)> = vec![
    (TierLabel::High, Regex::new(r"hr-|high_resource").unwrap()),
    (TierLabel::Medium, Regex::new(r"mr-|medium_resource").unwrap()),
    (TierLabel::Low, Regex::new(r"lr-|low_resource").unwrap()),
  ];
}

/// Tier named by an evaluation file name.
pub fn infer_tier(file_name: &str) -> Option<TierLabel> {
  let name = file_name.to_lowercase();
  if let Some(caps) = TIER_PREFIX_RE.captures(&name) {
    return Some(match &caps[1] {
      "hr" => TierLabel::High,
      "mr" => TierLabel::Medium,
      _ => TierLabel::Low,
    });
  }
  TIER_MARKERS.iter().find(|(_, re)| re.is_match(&name)).map(|(tier, _)| *tier)
}

pub fn infer_pos(file_name: &str) -> Option<PosGroup> {
  let name = file_name.to_lowercase();
  if name.contains("nouns") { Some(PosGroup::Nouns) }
  else if name.contains("verbs") { Some(PosGroup::Verbs) }
  else if name.contains("adjs") { Some(PosGroup::Adjectives) }
  else { None }
}

/// Reads one lm-evaluation-harness score file. The first task listed under
/// `results` is the one reported.
pub fn parse_score_file(path: &Path, tier: TierLabel, pos: Option<PosGroup>) -> Result<ResultRecord, ResultsError> {
  let text = fs::read_to_string(path).map_err(|source| ResultsError::Read { path: path.to_owned(), source })?;
  let data: Value = serde_json::from_str(&text).map_err(|source| ResultsError::Parse { path: path.to_owned(), source })?;

  let missing = |field: &'static str| ResultsError::MissingField { path: path.to_owned(), field };

  let (task_name, task_results) = data["results"].as_object()
    .and_then(|o| o.iter().next())
    .ok_or_else(|| missing("results"))?;
  let model = data["model_name"].as_str()
    .ok_or_else(|| missing("model_name"))?
    .rsplit('/').next().unwrap_or_default().to_owned();
  let accuracy = task_results["acc,none"].as_f64().ok_or_else(|| missing("acc,none"))?;
  let samples = data["n-samples"][task_name.as_str()]["effective"].as_u64().ok_or_else(|| missing("n-samples.effective"))?;

  Ok(ResultRecord { model, tier, pos, accuracy, samples })
}

/// All score files under `dir`, searched recursively.
pub fn parse_results_dir(dir: &Path, mode: ParseMode) -> Result<Vec<ResultRecord>, ResultsError> {
  info!(dir = %dir.display(), "searching for result files");
  let pattern = dir.join("**").join("*.json");
  let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?.filter_map(|p| p.ok()).collect();
  paths.sort();

  let mut records = vec![];
  for path in paths {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tier = infer_tier(&file_name);
    let pos = infer_pos(&file_name);

    let (tier, pos) = match (mode, tier, pos) {
      (ParseMode::Coarse, tier, pos) => (tier.unwrap_or(TierLabel::Unknown), pos),
      (ParseMode::FineGrained, Some(tier), Some(pos)) => (tier, Some(pos)),
      (ParseMode::FineGrained, _, _) => continue,
    };

    match parse_score_file(&path, tier, pos) {
      Ok(record) => records.push(record),
      Err(e) => warn!(error = %e, "skipping result file"),
    }
  }

  if records.is_empty() {
    warn!("no result files were found or parsed");
  }
  Ok(records)
}

#[derive(Serialize)]
struct CoarseRow<'a> {
  #[serde(rename = "Model")]
  model: &'a str,
  #[serde(rename = "Language Tier")]
  tier: &'static str,
  #[serde(rename = "Accuracy")]
  accuracy: f64,
  #[serde(rename = "Number of Samples")]
  samples: u64,
}

#[derive(Serialize)]
struct FineRow<'a> {
  #[serde(rename = "Model")]
  model: &'a str,
  #[serde(rename = "Language Tier")]
  tier: &'static str,
  #[serde(rename = "Part of Speech")]
  pos: &'static str,
  #[serde(rename = "Accuracy")]
  accuracy: f64,
  #[serde(rename = "Number of Samples")]
  samples: u64,
}

pub fn write_master_csv(records: &[ResultRecord], path: &Path, mode: ParseMode) -> Result<(), ResultsError> {
  let mut writer = csv::Writer::from_path(path)?;
  for r in records {
    match mode {
      ParseMode::Coarse => writer.serialize(CoarseRow { model: &r.model, tier: r.tier.label(), accuracy: r.accuracy, samples: r.samples })?,
      ParseMode::FineGrained => writer.serialize(FineRow {
        model: &r.model,
        tier: r.tier.label(),
        pos: r.pos.map(|p| p.label()).unwrap_or(""),
        accuracy: r.accuracy,
        samples: r.samples
      })?,
    }
  }
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn score_json(model: &str, accuracy: f64, samples: u64) -> String {
    format!(r#"{{
      "results": {{ "msi_task": {{ "alias": "msi_task", "acc,none": {}, "acc_stderr,none": 0.01 }} }},
      "n-samples": {{ "msi_task": {{ "original": {}, "effective": {} }} }},
      "model_name": "{}"
    }}"#, accuracy, samples, samples, model)
  }

  #[test]
  fn test_infer_tier() {
    assert_eq!(infer_tier("hr_gemma.json"), Some(TierLabel::High));
    assert_eq!(infer_tier("results-MR-nouns.json"), Some(TierLabel::Medium));
    assert_eq!(infer_tier("msi_benchmark_v2_low_resource_verbs.json"), Some(TierLabel::Low));
    assert_eq!(infer_tier("summary.json"), None);
  }

  #[test]
  fn test_infer_tier_prefers_higher_tier_marker() {
    assert_eq!(infer_tier("lr-vs-hr-nouns.json"), Some(TierLabel::High));
    assert_eq!(infer_tier("low_resource_vs_mr-verbs.json"), Some(TierLabel::Medium));
    assert_eq!(infer_tier("mr_then_hr-adjs.json"), Some(TierLabel::Medium));
  }

  #[test]
  fn test_infer_pos() {
    assert_eq!(infer_pos("hr-Nouns.json"), Some(PosGroup::Nouns));
    assert_eq!(infer_pos("lr-adjs.json"), Some(PosGroup::Adjectives));
    assert_eq!(infer_pos("lr.json"), None);
  }

  #[test]
  fn test_parse_results_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("Qwen3-8B");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("hr_gemma.json"), score_json("google/gemma-3-1b-it", 0.404, 1200)).unwrap();
    fs::write(nested.join("lr-verbs.json"), score_json("Qwen/Qwen3-8B", 0.39, 300)).unwrap();
    fs::write(dir.path().join("notes.json"), score_json("x/y", 0.5, 1)).unwrap();
    fs::write(dir.path().join("mr_broken.json"), "{}").unwrap();

    let coarse = parse_results_dir(dir.path(), ParseMode::Coarse).unwrap();
    assert_eq!(coarse.len(), 3);
    let gemma = coarse.iter().find(|r| r.model == "gemma-3-1b-it").unwrap();
    assert_eq!(gemma.tier, TierLabel::High);
    assert_eq!(gemma.samples, 1200);
    assert!(coarse.iter().any(|r| r.tier == TierLabel::Unknown));

    let fine = parse_results_dir(dir.path(), ParseMode::FineGrained).unwrap();
    assert_eq!(fine.len(), 1);
    assert_eq!(fine[0].model, "Qwen3-8B");
    assert_eq!(fine[0].pos, Some(PosGroup::Verbs));
    assert_eq!(fine[0].tier, TierLabel::Low);
  }

  #[test]
  fn test_master_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master_results.csv");
    let records = vec![ResultRecord { model: "Qwen3-8B".to_owned(), tier: TierLabel::High, pos: Some(PosGroup::Nouns), accuracy: 0.5, samples: 10 }];

    write_master_csv(&records, &path, ParseMode::FineGrained).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Model,Language Tier,Part of Speech,Accuracy,Number of Samples"));
    assert_eq!(lines.next(), Some("Qwen3-8B,High-Resource,Nouns,0.5,10"));
  }
}
