//! YAML definition files.

use super::DefinitionSource;
use crate::definition::{collect_definitions, Definitions, ObjectDefinition};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_FILE_BASE_NAME: &str = "fibre_context";
const DEFAULT_FILE_EXTENSION: &str = "yaml";

// --- Raw file layout ---

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
struct DefinitionFileRaw {
  #[serde(default)]
  objects: Vec<ObjectDefinitionRaw>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ObjectDefinitionRaw {
  id: String,
  #[serde(rename = "type")]
  type_name: String,
  #[serde(default)]
  values: IndexMap<String, Value>,
  #[serde(default)]
  refs: IndexMap<String, String>,
}

impl ObjectDefinitionRaw {
  fn process(self) -> Result<ObjectDefinition> {
    let mut definition = ObjectDefinition::new(self.id, self.type_name);
    for (field, value) in self.values {
      let literal = scalar_literal(&value).ok_or_else(|| {
        Error::ConfigParse(format!(
          "value '{}' of object '{}' must be a string, number or boolean",
          field,
          definition.id()
        ))
      })?;
      definition.value_dependencies.insert(field, literal);
    }
    definition.ref_dependencies = self.refs;
    Ok(definition)
  }
}

fn scalar_literal(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn parse_document(text: &str) -> Result<Vec<ObjectDefinition>> {
  if text.trim().is_empty() {
    return Ok(Vec::new());
  }
  let raw: DefinitionFileRaw =
    serde_yaml::from_str(text).map_err(|e| Error::ConfigParse(e.to_string()))?;
  raw.objects.into_iter().map(ObjectDefinitionRaw::process).collect()
}

// --- Source ---

#[derive(Debug, Clone)]
enum Document {
  Inline(String),
  File(PathBuf),
}

/// Reads definitions from one or more YAML documents.
///
/// ```yaml
/// objects:
///   - id: mailService
///     type: MailService
///     values: { protocol: POP3, port: 3000 }
///     refs: { userService: userService }
/// ```
///
/// Documents are read in the order they were added. An id may appear only
/// once across all of them.
#[derive(Debug, Clone, Default)]
pub struct YamlSource {
  documents: Vec<Document>,
}

impl YamlSource {
  pub fn inline(text: impl Into<String>) -> Self {
    Self {
      documents: vec![Document::Inline(text.into())],
    }
  }

  pub fn from_path(path: impl AsRef<Path>) -> Self {
    Self::from_paths([path])
  }

  pub fn from_paths<I, P>(paths: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
  {
    Self {
      documents: paths
        .into_iter()
        .map(|p| Document::File(p.as_ref().to_path_buf()))
        .collect(),
    }
  }

  /// Finds the definition file in the working directory.
  ///
  /// `fibre_context.<env>.yaml` is preferred over `fibre_context.yaml`. The
  /// environment comes from `environment_suffix`, then `FIBRE_ENV`, then
  /// `APP_ENV`.
  pub fn discover(environment_suffix: Option<&str>) -> Result<Self> {
    Self::discover_in(Path::new("."), environment_suffix)
  }

  /// Like [`YamlSource::discover`], searching `dir` instead of the working directory.
  pub fn discover_in(dir: &Path, environment_suffix: Option<&str>) -> Result<Self> {
    let env_from_var = environment_suffix
      .map(|s| s.to_string())
      .or_else(|| env::var("FIBRE_ENV").ok())
      .or_else(|| env::var("APP_ENV").ok());

    let mut files_to_check: Vec<String> = Vec::new();
    if let Some(env_str) = &env_from_var {
      if !env_str.is_empty() {
        files_to_check.push(format!(
          "{}.{}.{}",
          DEFAULT_FILE_BASE_NAME, env_str, DEFAULT_FILE_EXTENSION
        ));
      }
    }
    files_to_check.push(format!("{}.{}", DEFAULT_FILE_BASE_NAME, DEFAULT_FILE_EXTENSION));

    for file_name in &files_to_check {
      let path = dir.join(file_name);
      if path.is_file() {
        tracing::debug!(path = %path.display(), "found definition file");
        return Ok(Self::from_path(path));
      }
    }

    Err(Error::ConfigNotFound(format!(
      "searched for {} in {}",
      files_to_check.join(", "),
      dir.display()
    )))
  }

  /// Appends another document after the existing ones.
  pub fn and_path(mut self, path: impl AsRef<Path>) -> Self {
    self.documents.push(Document::File(path.as_ref().to_path_buf()));
    self
  }

  pub fn and_inline(mut self, text: impl Into<String>) -> Self {
    self.documents.push(Document::Inline(text.into()));
    self
  }
}

impl DefinitionSource for YamlSource {
  fn load(&self) -> Result<Definitions> {
    let mut all = Vec::new();
    for document in &self.documents {
      let parsed = match document {
        Document::Inline(text) => parse_document(text)?,
        Document::File(path) => {
          if !path.exists() {
            return Err(Error::ConfigNotFound(path.display().to_string()));
          }
          let text = fs::read_to_string(path)?;
          parse_document(&text).map_err(|e| match e {
            Error::ConfigParse(msg) => Error::ConfigParse(format!("{}: {}", path.display(), msg)),
            other => other,
          })?
        }
      };
      all.extend(parsed);
    }
    collect_definitions(all)
  }
}
