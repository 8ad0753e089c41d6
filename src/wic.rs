use std::collections::BTreeMap;

use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::graph::*;

/// Glosses with this many words or fewer are not usable as sentences.
const MIN_GLOSS_WORDS: usize = 3;
/// Only the top senses of a word are searched for glosses.
const MAX_SENSES_SEARCHED: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct WicTask {
  pub task_id: String,
  pub task_type: String,
  pub word: String,
  pub lang1: LanguageCode,
  pub sentence1: String,
  pub lang2: LanguageCode,
  pub sentence2: String,
  pub question: String,
  pub label: bool,
}

type GlossesByLanguage = BTreeMap<LanguageCode, Vec<String>>;

pub struct WicGenerator<'a, G: ?Sized> {
  pub graph: &'a G,
  pub lang1: LanguageCode,
  pub lang2: LanguageCode,
}

impl<'a, G: LexicalGraph + ?Sized> WicGenerator<'a, G> {
  pub fn new(graph: &'a G, lang1: LanguageCode, lang2: LanguageCode) -> WicGenerator<'a, G> {
    WicGenerator { graph, lang1, lang2 }
  }

  /// Up to two tasks per word: one pairing glosses of different senses, one
  /// pairing two glosses of the same sense. The counter runs across all words.
  pub fn generate<R: Rng>(&self, rng: &mut R, words: &[String]) -> Vec<WicTask> {
    let mut tasks = vec![];
    for word in words {
      info!("Processing ambiguous word: '{}'", word);
      match self.generate_for_word(rng, word, tasks.len()) {
        Ok(new_tasks) => tasks.extend(new_tasks),
        Err(e) => warn!(word = %word, error = %e, "lookup failed, skipping word"),
      }
    }
    tasks
  }

  fn generate_for_word<R: Rng>(&self, rng: &mut R, word: &str, counter: usize) -> Result<Vec<WicTask>, GraphError> {
    let mut tasks = vec![];

    let senses = self.graph.find_all_senses(word, &self.lang1)?;
    if senses.len() < 2 {
      info!(word, "fewer than two distinct meanings, skipping");
      return Ok(tasks);
    }

    let mut meanings: Vec<GlossesByLanguage> = vec![];
    for sense in senses.iter().take(MAX_SENSES_SEARCHED) {
      let glosses = match self.graph.glosses(sense) {
        Ok(glosses) => usable_glosses(glosses),
        Err(e) => {
          warn!(word, sense = %sense, error = %e, "gloss lookup failed, skipping sense");
          continue;
        }
      };
      if glosses.get(&self.lang1).map_or(false, |g| !g.is_empty()) {
        meanings.push(glosses);
      }
      if meanings.len() == 2 {
        break;
      }
    }

    if meanings.len() < 2 {
      info!(word, "failed to find two meanings with usable sentences, skipping");
      return Ok(tasks);
    }

    let (first, second) = (&meanings[0], &meanings[1]);
    let first_sentences = &first[&self.lang1];

    let (lang2, second_sentences) = match second.get(&self.lang2).filter(|g| !g.is_empty()) {
      Some(sentences) => (self.lang2.clone(), sentences),
      None => (self.lang1.clone(), &second[&self.lang1]),
    };

    if let (Some(sentence1), Some(sentence2)) = (first_sentences.choose(rng), second_sentences.choose(rng)) {
      tasks.push(self.task(word, counter + tasks.len() + 1, &lang2, sentence1, sentence2, false));
    }

    let distinct: Vec<&String> = first_sentences.iter().unique().collect();
    if distinct.len() > 1 {
      let pair: Vec<&&String> = distinct.choose_multiple(rng, 2).collect();
      let lang1 = self.lang1.clone();
      tasks.push(self.task(word, counter + tasks.len() + 1, &lang1, pair[0], pair[1], true));
    }

    Ok(tasks)
  }

  fn task(&self, word: &str, counter: usize, lang2: &LanguageCode, sentence1: &str, sentence2: &str, label: bool) -> WicTask {
    WicTask {
      task_id: format!("WiC-{}-{}-{:03}", self.lang1, lang2, counter),
      task_type: "word_in_context".to_owned(),
      word: word.to_owned(),
      lang1: self.lang1.clone(),
      sentence1: sentence1.to_owned(),
      lang2: lang2.clone(),
      sentence2: sentence2.to_owned(),
      question: format!("Does the word '{}' have the same meaning in both sentences? Answer with 'true' or 'false'.", word),
      label,
    }
  }
}

fn usable_glosses(glosses: Vec<Gloss>) -> GlossesByLanguage {
  let mut by_language = GlossesByLanguage::new();
  for gloss in glosses {
    if gloss.text.split_whitespace().count() > MIN_GLOSS_WORDS {
      by_language.entry(gloss.language).or_default().push(gloss.text);
    }
  }
  by_language
}
