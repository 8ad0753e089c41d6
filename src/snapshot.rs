use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::graph::*;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
  pub synsets: Vec<SynsetEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynsetEntry {
  pub id: SenseRef,
  pub pos: PartOfSpeech,
  /// Lemmas per language, main sense first.
  #[serde(default)]
  pub senses: BTreeMap<LanguageCode, Vec<String>>,
  #[serde(default)]
  pub glosses: BTreeMap<LanguageCode, Vec<String>>,
  #[serde(default)]
  pub edges: Vec<Edge>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
  pub relation: Relation,
  pub target: SenseRef,
}

/// A lexical graph held in memory, loaded from a JSON snapshot.
pub struct SnapshotGraph {
  synsets: Vec<SynsetEntry>,
  by_id: HashMap<SenseRef, usize>,
  by_lemma: HashMap<(LanguageCode, String), Vec<usize>>,
}

fn lemma_key(lemma: &str) -> String {
  surface_form(lemma.trim()).to_lowercase()
}

impl SnapshotGraph {
  pub fn new(snapshot: Snapshot) -> SnapshotGraph {
    let mut by_id = HashMap::new();
    let mut by_lemma: HashMap<(LanguageCode, String), Vec<usize>> = HashMap::new();

    for (i, synset) in snapshot.synsets.iter().enumerate() {
      by_id.insert(synset.id.clone(), i);
      for (language, lemmas) in &synset.senses {
        for lemma in lemmas {
          let entry = by_lemma.entry((language.clone(), lemma_key(lemma))).or_default();
          if !entry.contains(&i) {
            entry.push(i);
          }
        }
      }
    }

    SnapshotGraph { synsets: snapshot.synsets, by_id, by_lemma }
  }

  pub fn load(path: &Path) -> io::Result<SnapshotGraph> {
    let snapshot: Snapshot = serde_json::from_reader(io::BufReader::new(File::open(path)?))?;
    Ok(SnapshotGraph::new(snapshot))
  }

  pub fn len(&self) -> usize {
    self.synsets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.synsets.is_empty()
  }

  fn get(&self, sense: &SenseRef) -> Option<&SynsetEntry> {
    self.by_id.get(sense).map(|&i| &self.synsets[i])
  }

  fn search(&self, word: &str, language: &LanguageCode) -> impl Iterator<Item = &SynsetEntry> {
    self.by_lemma
      .get(&(language.clone(), lemma_key(word)))
      .into_iter()
      .flatten()
      .map(move |&i| &self.synsets[i])
  }
}

impl LexicalGraph for SnapshotGraph {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    Ok(self.search(word, language).filter(|s| s.pos == pos).map(|s| s.id.clone()).collect())
  }

  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError> {
    Ok(
      self.get(sense)
        .and_then(|s| s.senses.get(language))
        .and_then(|lemmas| lemmas.first())
        .map(|lemma| surface_form(lemma))
    )
  }

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError> {
    Ok(match self.get(sense) {
      Some(s) => s.edges.iter().filter(|e| e.relation == relation).map(|e| e.target.clone()).collect(),
      None => vec![]
    })
  }

  fn find_all_senses(&self, word: &str, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    Ok(self.search(word, language).map(|s| s.id.clone()).collect())
  }

  fn glosses(&self, sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    Ok(match self.get(sense) {
      Some(s) => s.glosses.iter()
        .flat_map(|(language, texts)| texts.iter().map(move |text| Gloss { language: language.clone(), text: text.clone() }))
        .collect(),
      None => vec![]
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  const SAMPLE: &str = r#"{
    "synsets": [
      {
        "id": "bn:00044994n",
        "pos": "NOUN",
        "senses": { "EN": ["house"], "DE": ["Haus", "Gebäude"], "fr": ["maison"] },
        "glosses": { "EN": ["a dwelling that serves as living quarters for one or more families"] },
        "edges": [
          { "relation": "HYPERNYM", "target": "bn:00012345n" },
          { "relation": "MERONYM_PART", "target": "bn:00067890n" }
        ]
      },
      {
        "id": "bn:00012345n",
        "pos": "NOUN",
        "senses": { "EN": ["building", "edifice"], "DE": ["Bauwerk"] }
      },
      {
        "id": "bn:00090001v",
        "pos": "VERB",
        "senses": { "EN": ["house"], "DE": ["unterbringen"] }
      },
      {
        "id": "bn:00067890n",
        "pos": "NOUN",
        "senses": { "EN": ["roof"], "DE": ["Dach"] }
      },
      {
        "id": "bn:00055555n",
        "pos": "NOUN",
        "senses": { "EN": ["ice_cream"], "DE": ["Speise_eis"] }
      }
    ]
  }"#;

  fn sample() -> SnapshotGraph {
    SnapshotGraph::new(serde_json::from_str(SAMPLE).unwrap())
  }

  #[test]
  fn test_find_senses_filters_pos() {
    let graph = sample();
    let en = LanguageCode::new("EN");
    assert_eq!(graph.find_senses("house", PartOfSpeech::Noun, &en).unwrap(), vec![SenseRef::new("bn:00044994n")]);
    assert_eq!(graph.find_senses("House", PartOfSpeech::Verb, &en).unwrap(), vec![SenseRef::new("bn:00090001v")]);
    assert!(graph.find_senses("house", PartOfSpeech::Adj, &en).unwrap().is_empty());
    assert_eq!(graph.find_all_senses("house", &en).unwrap().len(), 2);
    assert_eq!(graph.find_senses("ice cream", PartOfSpeech::Noun, &en).unwrap(), vec![SenseRef::new("bn:00055555n")]);
  }

  #[test]
  fn test_resolve_uses_main_sense() {
    let graph = sample();
    let house = SenseRef::new("bn:00044994n");
    assert_eq!(graph.resolve(&house, &LanguageCode::new("de")).unwrap(), Some("Haus".to_owned()));
    assert_eq!(graph.resolve(&house, &LanguageCode::new("FR")).unwrap(), Some("maison".to_owned()));
    assert_eq!(graph.resolve(&house, &LanguageCode::new("IT")).unwrap(), None);
    assert_eq!(graph.resolve(&SenseRef::new("bn:00055555n"), &LanguageCode::new("DE")).unwrap(), Some("Speise eis".to_owned()));
    assert_eq!(graph.resolve(&SenseRef::new("missing"), &LanguageCode::new("DE")).unwrap(), None);
  }

  #[test]
  fn test_related_and_glosses() {
    let graph = sample();
    let house = SenseRef::new("bn:00044994n");
    assert_eq!(graph.related(&house, Relation::Hypernym).unwrap(), vec![SenseRef::new("bn:00012345n")]);
    assert_eq!(graph.related(&house, Relation::PartMeronym).unwrap(), vec![SenseRef::new("bn:00067890n")]);
    assert!(graph.related(&house, Relation::MemberMeronym).unwrap().is_empty());

    let glosses = graph.glosses(&house).unwrap();
    assert_eq!(glosses.len(), 1);
    assert_eq!(glosses[0].language, LanguageCode::new("EN"));
  }

  #[test]
  fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let graph = SnapshotGraph::load(file.path()).unwrap();
    assert_eq!(graph.len(), 5);
  }

  #[test]
  fn test_sample_snapshot_builds_house_task() {
    use crate::assembler::{Assembler, TaskFormat};
    use crate::config::{Candidate, TargetLanguage};
    use rand::{SeedableRng, rngs::SmallRng};

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("sample_snapshot.json");
    let graph = SnapshotGraph::load(&path).unwrap();
    let seeds = vec![Candidate { word: "house".to_owned(), pos: PartOfSpeech::Noun, source_language: LanguageCode::new("EN") }];
    let assembler = Assembler::new(&graph, &seeds, TaskFormat::csi());
    let mut rng = SmallRng::seed_from_u64(3);

    let tasks = assembler.build_partition(&mut rng, &[TargetLanguage::new("DE", "German")]);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].answer, "Haus");
    assert_eq!(tasks[0].task_id, "CSI-EN-DE-001");
    assert!(tasks[0].is_well_formed());
    for choice in &tasks[0].choices {
      assert!(["Haus", "Gebäude", "Wohnung", "Dach", "Wand"].contains(&choice.as_str()));
    }
  }
}
