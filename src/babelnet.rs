use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::graph::*;

pub const DEFAULT_API_URL: &str = "https://babelnet.io/v9";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub api_key: Option<String>,
  pub base_url: String,
  pub timeout: Duration,
  /// Sense inventory restriction for sense searches.
  pub source: String,
}

impl Default for ApiConfig {
  fn default() -> ApiConfig {
    ApiConfig {
      api_key: None,
      base_url: DEFAULT_API_URL.to_owned(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      source: "WN".to_owned(),
    }
  }
}

impl ApiConfig {
  pub fn from_env() -> ApiConfig {
    let api_key = env_string("BABELNET_API_KEY").or_else(|| env_string("MY_API_KEY"));
    let base_url = env_string("BABELNET_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
    ApiConfig { api_key, base_url: normalize_endpoint(base_url), ..ApiConfig::default() }
  }
}

fn env_string(name: &str) -> Option<String> {
  std::env::var(name).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn normalize_endpoint(url: String) -> String {
  url.trim_end_matches('/').to_owned()
}

#[derive(Debug, Deserialize)]
struct SynsetIdItem {
  id: String,
}

#[derive(Debug, Deserialize)]
struct SynsetResponse {
  #[serde(default)]
  senses: Vec<SenseItem>,
  #[serde(default)]
  glosses: Vec<GlossItem>,
}

#[derive(Debug, Deserialize)]
struct SenseItem {
  properties: SenseProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SenseProperties {
  language: String,
  full_lemma: String,
}

#[derive(Debug, Deserialize)]
struct GlossItem {
  language: String,
  gloss: String,
}

#[derive(Debug, Deserialize)]
struct EdgeItem {
  target: Option<String>,
}

/// The remote BabelNet HTTP API.
pub struct ApiGraph {
  config: ApiConfig,
  api_key: String,
  client: reqwest::blocking::Client,
}

impl ApiGraph {
  pub fn new(config: ApiConfig) -> Result<ApiGraph, GraphError> {
    let api_key = config.api_key.clone().ok_or(GraphError::NotConfigured("BabelNet API key missing"))?;
    let client = reqwest::blocking::Client::builder()
      .timeout(config.timeout)
      .build()?;
    Ok(ApiGraph { config: ApiConfig { base_url: normalize_endpoint(config.base_url.clone()), ..config }, api_key, client })
  }

  fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T, GraphError> {
    let url = format!("{}/{}", self.config.base_url, endpoint);
    debug!(%url, ?params, "babelnet request");

    let response = self.client
      .get(&url)
      .query(params)
      .query(&[("key", self.api_key.as_str())])
      .send()?;

    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
      return Err(GraphError::HttpStatus { status, body });
    }
    Ok(serde_json::from_str(&body)?)
  }

  fn synset(&self, sense: &SenseRef, language: Option<&LanguageCode>) -> Result<SynsetResponse, GraphError> {
    match language {
      Some(language) => self.get("getSynset", &[("id", sense.as_str()), ("targetLang", language.as_str())]),
      None => self.get("getSynset", &[("id", sense.as_str())]),
    }
  }
}

impl LexicalGraph for ApiGraph {
  fn find_senses(&self, word: &str, pos: PartOfSpeech, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    let items: Vec<SynsetIdItem> = self.get("getSynsetIds", &[
      ("lemma", word),
      ("searchLang", language.as_str()),
      ("pos", pos.name()),
      ("source", self.config.source.as_str()),
    ])?;
    Ok(items.into_iter().map(|i| SenseRef::new(i.id)).collect())
  }

  fn resolve(&self, sense: &SenseRef, language: &LanguageCode) -> Result<Option<String>, GraphError> {
    let synset = self.synset(sense, Some(language))?;
    Ok(main_lemma(&synset, language))
  }

  fn related(&self, sense: &SenseRef, relation: Relation) -> Result<Vec<SenseRef>, GraphError> {
    let edges: Vec<EdgeItem> = self.get("getOutgoingEdges", &[
      ("id", sense.as_str()),
      ("relationGroup", relation.group_name()),
    ])?;
    Ok(edges.into_iter().filter_map(|e| e.target).map(SenseRef::new).collect())
  }

  fn find_all_senses(&self, word: &str, language: &LanguageCode) -> Result<Vec<SenseRef>, GraphError> {
    let items: Vec<SynsetIdItem> = self.get("getSynsetIds", &[
      ("lemma", word),
      ("searchLang", language.as_str()),
      ("source", self.config.source.as_str()),
    ])?;
    Ok(items.into_iter().map(|i| SenseRef::new(i.id)).collect())
  }

  fn glosses(&self, sense: &SenseRef) -> Result<Vec<Gloss>, GraphError> {
    let synset = self.synset(sense, None)?;
    Ok(synset.glosses.into_iter().map(|g| Gloss { language: LanguageCode::new(&g.language), text: g.gloss }).collect())
  }
}

fn main_lemma(synset: &SynsetResponse, language: &LanguageCode) -> Option<String> {
  synset.senses.iter()
    .find(|s| LanguageCode::new(&s.properties.language) == *language)
    .map(|s| surface_form(&s.properties.full_lemma))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_main_lemma_picks_language() {
    let synset: SynsetResponse = serde_json::from_str(r#"{
      "senses": [
        { "type": "BabelSense", "properties": { "fullLemma": "house", "language": "EN", "pos": "NOUN" } },
        { "type": "BabelSense", "properties": { "fullLemma": "Wohn_haus", "language": "DE", "pos": "NOUN" } },
        { "type": "BabelSense", "properties": { "fullLemma": "Haus", "language": "DE", "pos": "NOUN" } }
      ],
      "glosses": [ { "source": "WN", "language": "EN", "gloss": "a dwelling" } ]
    }"#).unwrap();
    assert_eq!(main_lemma(&synset, &LanguageCode::new("de")), Some("Wohn haus".to_owned()));
    assert_eq!(main_lemma(&synset, &LanguageCode::new("FR")), None);
    assert_eq!(synset.glosses[0].gloss, "a dwelling");
  }

  #[test]
  fn test_edges_without_target_are_dropped() {
    let edges: Vec<EdgeItem> = serde_json::from_str(r#"[
      { "source": "bn:1", "target": "bn:2", "pointer": { "relationGroup": "HYPERNYM" } },
      { "source": "bn:1" }
    ]"#).unwrap();
    let targets: Vec<SenseRef> = edges.into_iter().filter_map(|e| e.target).map(SenseRef::new).collect();
    assert_eq!(targets, vec![SenseRef::new("bn:2")]);
  }

  #[test]
  fn test_missing_key_is_not_configured() {
    let config = ApiConfig { api_key: None, ..ApiConfig::default() };
    assert!(matches!(ApiGraph::new(config), Err(GraphError::NotConfigured(_))));
  }

  #[test]
  fn test_endpoint_is_normalized() {
    assert_eq!(normalize_endpoint("https://babelnet.io/v9/".to_owned()), "https://babelnet.io/v9");
  }
}
