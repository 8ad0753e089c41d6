use std::thread;
use std::time::Duration;

use crate::graph::*;

/// Self-imposed delay before each call to an external graph service.
pub trait Pacer {
  fn pause(&self);
}

pub struct NoPacing;

impl Pacer for NoPacing {
  fn pause(&self) {}
}

pub struct FixedDelay(pub Duration);

impl FixedDelay {
  pub fn from_millis(ms: u64) -> FixedDelay {
    FixedDelay(Duration::from_millis(ms))
  }
}

impl Pacer for FixedDelay {
  fn pause(&self) {
    if !self.0.is_zero() {
      thread::sleep(self.0);
    }
  }
}

/// A graph client whose every lookup waits on `pacer` first.
pub struct Paced<G, P> {
  pub inner: G,
  pub pacer: P,
}

impl<G: LexicalGraph, P: Pacer> Paced<G, P> {
  pub fn new(inner: G, pacer: P) -> Paced<G, P> {
    Paced { inner, pacer }
  }
}

impl<G: LexicalGraph, P: Pacer> LexicalGraph for Paced<G, P> {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    self.pacer.pause();
    self.inner.find_senses(word, pos, language)
  }

  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError> {
    self.pacer.pause();
    self.inner.resolve(sense, language)
  }

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError> {
    self.pacer.pause();
    self.inner.related(sense, relation)
  }

  fn find_all_senses(&self, word: &str, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    self.pacer.pause();
    self.inner.find_all_senses(word, language)
  }

  fn glosses(&self, sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    self.pacer.pause();
    self.inner.glosses(sense)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;
  use crate::stub::StubGraph;

  struct CountingPacer {
    pauses: Cell<usize>
  }

  impl Pacer for CountingPacer {
    fn pause(&self) {
      self.pauses.set(self.pauses.get() + 1);
    }
  }

  #[test]
  fn test_every_lookup_is_paced() {
    let graph = StubGraph::new()
      .sense("house", PartOfSpeech::Noun, "EN", "S1")
      .lemma("S1", "DE", "Haus");
    let paced = Paced::new(graph, CountingPacer { pauses: Cell::new(0) });
    let en = LanguageCode::new("EN");
    let de = LanguageCode::new("DE");

    let senses = paced.find_senses("house", PartOfSpeech::Noun, &en).unwrap();
    assert_eq!(senses, vec![SenseRef::new("S1")]);
    assert_eq!(paced.resolve(&senses[0], &de).unwrap(), Some("Haus".to_owned()));
    assert!(paced.related(&senses[0], Relation::Hypernym).unwrap().is_empty());

    assert_eq!(paced.pacer.pauses.get(), 3);
  }

  #[test]
  fn test_zero_delay_does_not_sleep() {
    FixedDelay::from_millis(0).pause();
  }
}
