use std::fmt;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Identifier of a sense (synset) in the lexical graph.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseRef(String);

impl SenseRef {
  pub fn new<S: Into<String>>(id: S) -> SenseRef {
    SenseRef(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for SenseRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Language code, always upper case ("de" and "DE" are the same language).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
  pub fn new(code: &str) -> LanguageCode {
    LanguageCode(code.trim().to_uppercase())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<String> for LanguageCode {
  fn from(code: String) -> LanguageCode {
    LanguageCode::new(&code)
  }
}

impl From<&str> for LanguageCode {
  fn from(code: &str) -> LanguageCode {
    LanguageCode::new(code)
  }
}

impl From<LanguageCode> for String {
  fn from(code: LanguageCode) -> String {
    code.0
  }
}

impl fmt::Display for LanguageCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PartOfSpeech {
  #[serde(rename = "NOUN")]
  Noun,
  #[serde(rename = "VERB")]
  Verb,
  #[serde(rename = "ADJ")]
  Adj,
}

impl PartOfSpeech {
  pub fn name(&self) -> &'static str {
    use PartOfSpeech::*;
    match self {
      Noun => "NOUN",
      Verb => "VERB",
      Adj => "ADJ",
    }
  }

  pub fn from_name(text: &str) -> Option<PartOfSpeech> {
    use PartOfSpeech::*;
    Some(match text.trim().to_uppercase().as_str() {
      "NOUN" => Noun,
      "VERB" => Verb,
      "ADJ" | "ADJECTIVE" => Adj,
      _ => return None
    })
  }

  pub fn all() -> [PartOfSpeech; 3] {
    use PartOfSpeech::*;
    [Noun, Verb, Adj]
  }
}

impl fmt::Display for PartOfSpeech {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Relation {
  #[serde(rename = "HYPERNYM")]
  Hypernym,
  #[serde(rename = "MERONYM_PART")]
  PartMeronym,
  #[serde(rename = "MERONYM_MEMBER")]
  MemberMeronym,
}

impl Relation {
  /// Relation group name as the BabelNet API spells it.
  pub fn group_name(&self) -> &'static str {
    use Relation::*;
    match self {
      Hypernym => "HYPERNYM",
      PartMeronym => "MERONYM_PART",
      MemberMeronym => "MERONYM_MEMBER",
    }
  }

  pub fn short_name(&self) -> &'static str {
    use Relation::*;
    match self {
      Hypernym => "is-a",
      PartMeronym => "part-of",
      MemberMeronym => "member-of",
    }
  }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gloss {
  pub language: LanguageCode,
  pub text: String,
}

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("graph client not configured: {0}")]
  NotConfigured(&'static str),
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("HTTP {status}: {body}")]
  HttpStatus {
    status: reqwest::StatusCode,
    body: String,
  },
  #[error("JSON decode failed: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// The lookups benchmark generation needs from a lexical knowledge graph.
///
/// Implementations report transport failures as `Err`; "nothing found" is an
/// empty result, never an error.
pub trait LexicalGraph {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError>;

  /// Surface form of `sense` in `language`, with underscores read as spaces.
  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError>;

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError>;

  /// Senses of `word` regardless of part of speech.
  fn find_all_senses(&self, word: &str, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    let mut senses: Vec<SenseRef> = vec![];
    for pos in PartOfSpeech::all() {
      for sense in self.find_senses(word, pos, language)? {
        if !senses.contains(&sense) {
          senses.push(sense);
        }
      }
    }
    Ok(senses)
  }

  fn glosses(&self, _sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    Ok(vec![])
  }
}

impl<G: LexicalGraph + ?Sized> LexicalGraph for Box<G> {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    (**self).find_senses(word, pos, language)
  }

  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError> {
    (**self).resolve(sense, language)
  }

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError> {
    (**self).related(sense, relation)
  }

  fn find_all_senses(&self, word: &str, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    (**self).find_all_senses(word, language)
  }

  fn glosses(&self, sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    (**self).glosses(sense)
  }
}

pub fn surface_form(lemma: &str) -> String {
  lemma.replace('_', " ")
}

/// Lemma comparison used for primary-sense matching.
pub fn same_lemma(a: &str, b: &str) -> bool {
  surface_form(a.trim()).to_lowercase() == surface_form(b.trim()).to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_language_codes_are_upper_case() {
    assert_eq!(LanguageCode::new("de"), LanguageCode::new("DE"));
    assert_eq!(LanguageCode::new(" fr ").as_str(), "FR");
    let code: LanguageCode = serde_json::from_str("\"pt\"").unwrap();
    assert_eq!(code.as_str(), "PT");
  }

  #[test]
  fn test_part_of_speech_names() {
    assert_eq!(PartOfSpeech::from_name("noun"), Some(PartOfSpeech::Noun));
    assert_eq!(PartOfSpeech::from_name("ADJ"), Some(PartOfSpeech::Adj));
    assert_eq!(PartOfSpeech::from_name("adverb"), None);
    assert_eq!(serde_json::to_string(&PartOfSpeech::Verb).unwrap(), "\"VERB\"");
  }

  #[test]
  fn test_same_lemma() {
    assert!(same_lemma("House", "house"));
    assert!(same_lemma("ice_cream", "ice cream"));
    assert!(!same_lemma("houses", "house"));
  }
}
