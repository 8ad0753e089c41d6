use std::collections::{HashMap, HashSet};
use std::cell::RefCell;

use crate::graph::*;

/// In-memory graph for tests. Lookups for anything registered as failing
/// return an I/O error, standing in for a transport failure.
#[derive(Default)]
pub struct StubGraph {
  senses: HashMap<(String, PartOfSpeech, LanguageCode), Vec<SenseRef>>,
  lemmas: HashMap<(SenseRef, LanguageCode), String>,
  edges: HashMap<(SenseRef, Relation), Vec<SenseRef>>,
  glosses: HashMap<SenseRef, Vec<Gloss>>,
  failing_words: HashSet<String>,
  failing_senses: HashSet<SenseRef>,
  pub queried_words: RefCell<Vec<String>>,
}

impl StubGraph {
  pub fn new() -> StubGraph {
    StubGraph::default()
  }

  pub fn sense(mut self, word: &str, pos: PartOfSpeech, language: &str, id: &str) -> StubGraph {
    self.senses.entry((word.to_owned(), pos, LanguageCode::new(language))).or_default().push(SenseRef::new(id));
    self
  }

  pub fn lemma(mut self, id: &str, language: &str, lemma: &str) -> StubGraph {
    self.lemmas.insert((SenseRef::new(id), LanguageCode::new(language)), lemma.to_owned());
    self
  }

  pub fn edge(mut self, id: &str, relation: Relation, target: &str) -> StubGraph {
    self.edges.entry((SenseRef::new(id), relation)).or_default().push(SenseRef::new(target));
    self
  }

  pub fn gloss(mut self, id: &str, language: &str, text: &str) -> StubGraph {
    self.glosses.entry(SenseRef::new(id)).or_default().push(Gloss { language: LanguageCode::new(language), text: text.to_owned() });
    self
  }

  pub fn failing_word(mut self, word: &str) -> StubGraph {
    self.failing_words.insert(word.to_owned());
    self
  }

  pub fn failing_sense(mut self, id: &str) -> StubGraph {
    self.failing_senses.insert(SenseRef::new(id));
    self
  }

  fn check(&self, sense: &SenseRef) -> Result<(), GraphError> {
    if self.failing_senses.contains(sense) {
      Err(GraphError::Io(std::io::Error::new(std::io::ErrorKind::Other, format!("lookup of {} failed", sense))))
    }
    else {
      Ok(())
    }
  }
}

impl LexicalGraph for StubGraph {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    self.queried_words.borrow_mut().push(word.to_owned());
    if self.failing_words.contains(word) {
      return Err(GraphError::Io(std::io::Error::new(std::io::ErrorKind::Other, format!("search for {} failed", word))));
    }
    Ok(self.senses.get(&(word.to_owned(), pos, language.clone())).cloned().unwrap_or_default())
  }

  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError> {
    self.check(sense)?;
    Ok(self.lemmas.get(&(sense.clone(), language.clone())).map(|l| surface_form(l)))
  }

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError> {
    self.check(sense)?;
    Ok(self.edges.get(&(sense.clone(), relation)).cloned().unwrap_or_default())
  }

  fn glosses(&self, sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    self.check(sense)?;
    Ok(self.glosses.get(sense).cloned().unwrap_or_default())
  }
}
