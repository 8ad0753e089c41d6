use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::graph::LanguageCode;

/// One multiple-choice question.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BenchmarkTask {
  pub task_id: String,
  pub task_type: String,
  pub source_word: String,
  #[serde(rename = "source_lang")]
  pub source_language: LanguageCode,
  #[serde(rename = "target_lang")]
  pub target_language: LanguageCode,
  pub question: String,
  pub choices: Vec<String>,
  pub answer: String,
}

impl BenchmarkTask {
  /// `answer` is among exactly four distinct choices.
  pub fn is_well_formed(&self) -> bool {
    let mut sorted = self.choices.clone();
    sorted.sort();
    sorted.dedup();
    self.choices.len() == 4 && sorted.len() == 4 && self.choices.contains(&self.answer)
  }
}

/// Writes one JSON object per line, creating parent directories as needed.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  let mut writer = BufWriter::new(File::create(path)?);
  for item in items {
    serde_json::to_writer(&mut writer, item)?;
    writer.write_all(b"\n")?;
  }
  writer.flush()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn task() -> BenchmarkTask {
    BenchmarkTask {
      task_id: "CSI-EN-DE-001".to_owned(),
      task_type: "csi_custom_task".to_owned(),
      source_word: "house".to_owned(),
      source_language: LanguageCode::new("EN"),
      target_language: LanguageCode::new("DE"),
      question: "Which word has the same meaning as 'house' in German?".to_owned(),
      choices: vec!["Gebäude".to_owned(), "Haus".to_owned(), "Dach".to_owned(), "Wand".to_owned()],
      answer: "Haus".to_owned(),
    }
  }

  #[test]
  fn test_field_names_and_unicode() {
    let line = serde_json::to_string(&task()).unwrap();
    assert!(line.starts_with(r#"{"task_id":"CSI-EN-DE-001","task_type":"csi_custom_task","source_word":"house","source_lang":"EN","target_lang":"DE","question":"#));
    assert!(line.contains("Gebäude"));
  }

  #[test]
  fn test_well_formed() {
    assert!(task().is_well_formed());

    let mut duplicate = task();
    duplicate.choices[0] = "Haus".to_owned();
    assert!(!duplicate.is_well_formed());

    let mut missing = task();
    missing.answer = "Heim".to_owned();
    assert!(!missing.is_well_formed());
  }

  #[test]
  fn test_jsonl_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.jsonl");
    let mut second = task();
    second.task_id = "CSI-EN-DE-002".to_owned();

    write_jsonl(&path, &[task(), second]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with('\n'));

    let back: Vec<BenchmarkTask> = text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(back[1].task_id, "CSI-EN-DE-002");
    assert_eq!(back[0], task());
  }
}
