use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::{Candidate, LanguageTiers, TargetLanguage, Tier};
use crate::distractors::*;
use crate::graph::*;
use crate::task::BenchmarkTask;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopOrder {
  /// Every language for the first word, then the next word.
  WordsFirst,
  /// Every word for the first language, then the next language.
  LanguagesFirst,
}

/// How tasks of one benchmark are named and worded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TaskFormat {
  pub id_prefix: String,
  pub task_type: String,
  pub id_width: usize,
  /// `{word}` and `{language}` are substituted.
  pub question_template: String,
  pub order: LoopOrder,
}

impl TaskFormat {
  pub fn csi() -> TaskFormat {
    TaskFormat {
      id_prefix: "CSI".to_owned(),
      task_type: "csi_custom_task".to_owned(),
      id_width: 3,
      question_template: "Which word has the same meaning as '{word}' in {language}?".to_owned(),
      order: LoopOrder::WordsFirst,
    }
  }

  pub fn msi() -> TaskFormat {
    TaskFormat {
      id_prefix: "MSI".to_owned(),
      task_type: "msi_custom_task".to_owned(),
      id_width: 4,
      question_template: "Which word has the same meaning as the '{word}' in {language}?".to_owned(),
      order: LoopOrder::LanguagesFirst,
    }
  }

  pub fn task_id(&self, source: &LanguageCode, target: &LanguageCode, counter: usize) -> String {
    format!("{}-{}-{}-{:0width$}", self.id_prefix, source, target, counter, width = self.id_width)
  }

  pub fn question(&self, word: &str, language_name: &str) -> String {
    self.question_template.replace("{word}", word).replace("{language}", language_name)
  }
}

/// Tasks destined for one output file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TierPartition {
  pub tier: Tier,
  pub tasks: Vec<BenchmarkTask>,
}

impl TierPartition {
  pub fn file_name(&self, stem: &str) -> String {
    format!("{}_{}.jsonl", stem, self.tier.key())
  }
}

pub struct Assembler<'a, G: ?Sized> {
  pub graph: &'a G,
  pub seeds: &'a [Candidate],
  pub format: TaskFormat,
  pub desired_count: usize,
  pub relations: Vec<Relation>,
}

impl<'a, G: LexicalGraph + ?Sized> Assembler<'a, G> {
  pub fn new(graph: &'a G, seeds: &'a [Candidate], format: TaskFormat) -> Assembler<'a, G> {
    Assembler {
      graph,
      seeds,
      format,
      desired_count: DEFAULT_DESIRED_COUNT,
      relations: DEFAULT_RELATIONS.to_vec(),
    }
  }

  /// One partition per tier, each with its own task counter. Tiers without
  /// languages are left out.
  pub fn build_tasks<R: Rng>(&self, rng: &mut R, tiers: &LanguageTiers) -> Vec<TierPartition> {
    let mut partitions = vec![];
    for (tier, languages) in tiers.iter() {
      if languages.is_empty() {
        continue;
      }
      info!(tier = tier.key(), languages = languages.len(), "generating tier");
      let tasks = self.build_partition(rng, languages);
      info!(tier = tier.key(), tasks = tasks.len(), "tier done");
      partitions.push(TierPartition { tier, tasks });
    }
    partitions
  }

  /// Tasks for every (seed word, language) pair that has enough data, numbered
  /// in generation order.
  pub fn build_partition<R: Rng>(&self, rng: &mut R, languages: &[TargetLanguage]) -> Vec<BenchmarkTask> {
    let mut tasks = vec![];

    let pairs: Vec<(&Candidate, &TargetLanguage)> = match self.format.order {
      LoopOrder::WordsFirst =>
        self.seeds.iter().flat_map(|c| languages.iter().map(move |l| (c, l))).collect(),
      LoopOrder::LanguagesFirst =>
        languages.iter().flat_map(|l| self.seeds.iter().map(move |c| (c, l))).collect(),
    };

    for (candidate, language) in pairs {
      if let Some(task) = self.build_task(rng, candidate, language, tasks.len() + 1) {
        tasks.push(task);
      }
    }

    tasks
  }

  /// `None` when the word has no sense, no translation, or too few distractors.
  pub fn build_task<R: Rng>(
    &self,
    rng: &mut R,
    candidate: &Candidate,
    language: &TargetLanguage,
    counter: usize
  ) -> Option<BenchmarkTask> {
    info!("Processing '{}' ({}) -> {}", candidate.word, candidate.pos, language.name);

    let Some(sense) = primary_sense(self.graph, candidate) else {
      debug!(word = %candidate.word, "no main concept, skipping");
      return None;
    };

    let Some(answer) = translate(self.graph, &sense, &language.code) else {
      debug!(word = %candidate.word, language = %language.code, "no translation, skipping");
      return None;
    };
    debug!(word = %candidate.word, answer = %answer, "found translation");

    let selector = DistractorSelector {
      graph: self.graph,
      pool: self.seeds,
      relations: self.relations.clone(),
    };
    let distractors: Vec<String> = selector
      .select(rng, candidate, &sense, &language.code, &answer, self.desired_count)
      .into_iter()
      .collect();

    if distractors.len() < MIN_DISTRACTORS {
      info!(word = %candidate.word, language = %language.code, "could not generate enough unique distractors, skipping");
      return None;
    }

    let mut choices: Vec<String> = distractors.choose_multiple(rng, MIN_DISTRACTORS).cloned().collect();
    choices.push(answer.clone());
    choices.shuffle(rng);

    Some(BenchmarkTask {
      task_id: self.format.task_id(&candidate.source_language, &language.code, counter),
      task_type: self.format.task_type.clone(),
      source_word: candidate.word.clone(),
      source_language: candidate.source_language.clone(),
      target_language: language.code.clone(),
      question: self.format.question(&candidate.word, &language.name),
      choices,
      answer,
    })
  }
}
