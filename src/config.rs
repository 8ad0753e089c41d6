use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::graph::{LanguageCode, PartOfSpeech};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read {path}: {source}")]
  Read { path: String, source: io::Error },
  #[error("cannot parse {path}: {source}")]
  Parse { path: String, source: serde_json::Error },
  #[error("invalid language spec '{0}', expected CODE:Name")]
  LanguageSpec(String),
  #[error("no target languages configured")]
  NoLanguages,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SeedWord {
  pub word: String,
  pub pos: PartOfSpeech,
}

/// A word to build tasks for, with the language it is written in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Candidate {
  pub word: String,
  pub pos: PartOfSpeech,
  pub source_language: LanguageCode,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TargetLanguage {
  pub code: LanguageCode,
  pub name: String,
}

impl TargetLanguage {
  pub fn new(code: &str, name: &str) -> TargetLanguage {
    TargetLanguage { code: LanguageCode::new(code), name: name.to_owned() }
  }

  /// Parses `DE:German`.
  pub fn parse(spec: &str) -> Result<TargetLanguage, ConfigError> {
    match spec.split_once(':') {
      Some((code, name)) if !code.trim().is_empty() && !name.trim().is_empty() =>
        Ok(TargetLanguage::new(code, name.trim())),
      _ => Err(ConfigError::LanguageSpec(spec.to_owned()))
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Tier {
  #[serde(rename = "high_resource")]
  High,
  #[serde(rename = "medium_resource")]
  Medium,
  #[serde(rename = "low_resource")]
  Low,
}

impl Tier {
  pub fn all() -> [Tier; 3] {
    [Tier::High, Tier::Medium, Tier::Low]
  }

  /// Key used in configuration files and output file names.
  pub fn key(&self) -> &'static str {
    match self {
      Tier::High => "high_resource",
      Tier::Medium => "medium_resource",
      Tier::Low => "low_resource",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Tier::High => "High-Resource",
      Tier::Medium => "Medium-Resource",
      Tier::Low => "Low-Resource",
    }
  }
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Target languages grouped by resource tier, in tier order.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LanguageTiers {
  #[serde(rename = "high_resource", default)]
  pub high: Vec<TargetLanguage>,
  #[serde(rename = "medium_resource", default)]
  pub medium: Vec<TargetLanguage>,
  #[serde(rename = "low_resource", default)]
  pub low: Vec<TargetLanguage>,
}

impl LanguageTiers {
  pub fn get(&self, tier: Tier) -> &[TargetLanguage] {
    match tier {
      Tier::High => &self.high,
      Tier::Medium => &self.medium,
      Tier::Low => &self.low,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (Tier, &[TargetLanguage])> {
    Tier::all().into_iter().map(move |t| (t, self.get(t)))
  }

  pub fn language_count(&self) -> usize {
    self.high.len() + self.medium.len() + self.low.len()
  }

  pub fn load(path: &Path) -> Result<LanguageTiers, ConfigError> {
    let tiers: LanguageTiers = read_json(path)?;
    if tiers.language_count() == 0 {
      return Err(ConfigError::NoLanguages);
    }
    Ok(tiers)
  }

  pub fn default_tiers() -> LanguageTiers {
    fn langs(items: &[(&str, &str)]) -> Vec<TargetLanguage> {
      items.iter().map(|(code, name)| TargetLanguage::new(code, name)).collect()
    }

    LanguageTiers {
      high: langs(&[
        ("ES", "Spanish"), ("FR", "French"), ("DE", "German"), ("IT", "Italian"),
        ("PT", "Portuguese"), ("RU", "Russian"), ("ZH", "Chinese"), ("JA", "Japanese"),
        ("KO", "Korean"), ("AR", "Arabic"), ("TR", "Turkish"), ("NL", "Dutch"),
        ("PL", "Polish"), ("SV", "Swedish"), ("NO", "Norwegian"), ("DA", "Danish"),
        ("FI", "Finnish"), ("CS", "Czech"), ("RO", "Romanian"), ("HU", "Hungarian"),
        ("UK", "Ukrainian"), ("HE", "Hebrew"), ("BG", "Bulgarian"), ("EL", "Greek"),
      ]),
      medium: langs(&[
        ("HR", "Croatian"), ("SR", "Serbian"), ("SK", "Slovak"), ("SL", "Slovenian"),
        ("LT", "Lithuanian"), ("LV", "Latvian"), ("ET", "Estonian"), ("TH", "Thai"),
        ("VI", "Vietnamese"), ("MS", "Malay"), ("FA", "Persian"), ("ID", "Indonesian"),
        ("TA", "Tamil"), ("HI", "Hindi"), ("BN", "Bengali"),
      ]),
      low: langs(&[
        ("SW", "Swahili"), ("IS", "Icelandic"), ("MT", "Maltese"), ("GA", "Irish"),
        ("CY", "Welsh"), ("BS", "Bosnian"), ("KA", "Georgian"), ("AM", "Amharic"),
        ("UZ", "Uzbek"), ("TL", "Tagalog"),
      ]),
    }
  }
}

/// Seed words, immutable once loaded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SeedList {
  pub words: Vec<SeedWord>,
}

impl SeedList {
  pub fn new(words: Vec<SeedWord>) -> SeedList {
    SeedList { words }
  }

  pub fn load(path: &Path) -> Result<SeedList, ConfigError> {
    Ok(SeedList { words: read_json(path)? })
  }

  pub fn default_seeds() -> SeedList {
    use PartOfSpeech::*;
    let pairs = [
      ("house", Noun), ("water", Noun), ("sun", Noun), ("tree", Noun),
      ("eat", Verb), ("walk", Verb), ("see", Verb),
      ("big", Adj), ("small", Adj), ("happy", Adj), ("sad", Adj),
    ];
    SeedList {
      words: pairs.iter().map(|(word, pos)| SeedWord { word: word.to_string(), pos: *pos }).collect()
    }
  }

  pub fn candidates(&self, source_language: &LanguageCode) -> Vec<Candidate> {
    self.words.iter().map(|s| Candidate {
      word: s.word.clone(),
      pos: s.pos,
      source_language: source_language.clone()
    }).collect()
  }
}

/// Ambiguous words used as word-in-context seeds.
pub fn default_ambiguous_words() -> Vec<String> {
  ["bank", "crane", "match", "right", "ring", "bat", "bar", "bass", "firm", "star"]
    .iter().map(|w| w.to_string()).collect()
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let path_str = path.display().to_string();
  let file = File::open(path).map_err(|source| ConfigError::Read { path: path_str.clone(), source })?;
  serde_json::from_reader(io::BufReader::new(file)).map_err(|source| ConfigError::Parse { path: path_str, source })
}
