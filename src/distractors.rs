use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::Candidate;
use crate::graph::*;

/// Fewest distractors a task can be built from.
pub const MIN_DISTRACTORS: usize = 3;

/// How many related distractors to gather before filtering.
pub const DEFAULT_DESIRED_COUNT: usize = 5;

pub const DEFAULT_RELATIONS: [Relation; 3] = [Relation::Hypernym, Relation::PartMeronym, Relation::MemberMeronym];

/// First sense of the candidate whose own surface form is the candidate word,
/// or else the first sense found at all.
pub fn primary_sense<G: LexicalGraph + ?Sized>(graph: &G, candidate: &Candidate) -> Option<SenseRef> {
  let senses = match graph.find_senses(&candidate.word, candidate.pos, &candidate.source_language) {
    Ok(senses) => senses,
    Err(e) => {
      warn!(word = %candidate.word, error = %e, "sense search failed");
      return None;
    }
  };

  for sense in &senses {
    match graph.resolve(sense, &candidate.source_language) {
      Ok(Some(lemma)) if same_lemma(&lemma, &candidate.word) => return Some(sense.clone()),
      Ok(_) => (),
      Err(e) => warn!(sense = %sense, error = %e, "lemma lookup failed"),
    }
  }

  let first = senses.into_iter().next();
  if first.is_some() {
    debug!(word = %candidate.word, "no exact lemma match, using first sense");
  }
  else {
    debug!(word = %candidate.word, pos = %candidate.pos, "no senses found");
  }
  first
}

/// Target-language surface form of `sense`, if it has a non-empty one.
pub fn translate<G: LexicalGraph + ?Sized>(graph: &G, sense: &SenseRef, language: &LanguageCode) -> Option<String> {
  match graph.resolve(sense, language) {
    Ok(Some(text)) => {
      let text = text.trim();
      if text.is_empty() { None } else { Some(text.to_owned()) }
    },
    Ok(None) => None,
    Err(e) => {
      warn!(sense = %sense, language = %language, error = %e, "translation lookup failed");
      None
    }
  }
}

pub struct DistractorSelector<'a, G: ?Sized> {
  pub graph: &'a G,
  /// Candidates the random fallback may draw from.
  pub pool: &'a [Candidate],
  pub relations: Vec<Relation>,
}

impl<'a, G: LexicalGraph + ?Sized> DistractorSelector<'a, G> {
  pub fn new(graph: &'a G, pool: &'a [Candidate]) -> DistractorSelector<'a, G> {
    DistractorSelector { graph, pool, relations: DEFAULT_RELATIONS.to_vec() }
  }

  /// Plausible wrong answers for `current`, whose primary sense is `sense` and
  /// whose translation is `correct_answer`. Fewer than `MIN_DISTRACTORS`
  /// entries means there is not enough data for a task.
  pub fn select<R: Rng>(
    &self,
    rng: &mut R,
    current: &Candidate,
    sense: &SenseRef,
    target_language: &LanguageCode,
    correct_answer: &str,
    desired_count: usize
  ) -> BTreeSet<String> {
    let mut distractors = self.related_distractors(sense, target_language, desired_count);
    distractors.remove(correct_answer);

    if distractors.len() < MIN_DISTRACTORS {
      debug!(word = %current.word, found = distractors.len(), "not enough related distractors, sampling fallback");
      distractors.extend(self.fallback_distractors(rng, current, target_language, correct_answer));
    }

    distractors
  }

  /// Surface forms of senses related to `sense`, relation kinds tried in order,
  /// stopping once `desired_count` are found.
  pub fn related_distractors(&self, sense: &SenseRef, target_language: &LanguageCode, desired_count: usize) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for &relation in &self.relations {
      if found.len() >= desired_count {
        break;
      }

      let related = match self.graph.related(sense, relation) {
        Ok(related) => related,
        Err(e) => {
          warn!(sense = %sense, relation = relation.short_name(), error = %e, "relation lookup failed");
          continue;
        }
      };

      for other in &related {
        if let Some(text) = translate(self.graph, other, target_language) {
          found.insert(text);
          if found.len() >= desired_count {
            return found;
          }
        }
      }
    }

    found
  }

  /// Translations of up to three randomly drawn seed words other than `current`.
  pub fn fallback_distractors<R: Rng>(
    &self,
    rng: &mut R,
    current: &Candidate,
    target_language: &LanguageCode,
    correct_answer: &str
  ) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    let others: Vec<&Candidate> = self.pool.iter().filter(|c| c.word != current.word).collect();
    if others.len() < MIN_DISTRACTORS {
      return found;
    }

    for other in others.choose_multiple(rng, MIN_DISTRACTORS) {
      let Some(other_sense) = primary_sense(self.graph, other) else { continue };
      if let Some(text) = translate(self.graph, &other_sense, target_language) {
        if text != correct_answer {
          found.insert(text);
        }
      }
    }

    found
  }
}
