#![allow(dead_code)]

use fibre_context::{
  BoxError, BoxedObject, DefinitionRewriter, InstanceRewriter, ObjectDefinition, TypeRegistry,
};
use std::sync::{Arc, Mutex};

// --- Plain objects ---

#[derive(Debug, Default)]
pub struct UserService {
  pub name: String,
  pub processed: bool,
}

#[derive(Debug)]
pub struct MailService {
  pub protocol: String,
  pub port: i32,
  pub users: Option<Arc<UserService>>,
}

impl Default for MailService {
  fn default() -> Self {
    Self {
      protocol: String::new(),
      port: 5,
      users: None,
    }
  }
}

#[derive(Debug, Default)]
pub struct Settings {
  pub retries: i32,
  pub level: i8,
  pub window: i16,
  pub budget: i64,
  pub enabled: bool,
  pub label: String,
}

/// Registers `UserService`, `MailService` and `Settings` with their setters.
pub fn base_registry() -> TypeRegistry {
  let mut registry = TypeRegistry::new();
  registry
    .register::<UserService>("UserService")
    .value("name", |u: &mut UserService, v: String| u.name = v);
  registry
    .register::<MailService>("MailService")
    .value("protocol", |m: &mut MailService, v: String| m.protocol = v)
    .value("port", |m: &mut MailService, v: i32| m.port = v)
    .reference("users", |m: &mut MailService, u: Arc<UserService>| {
      m.users = Some(u)
    });
  registry
    .register::<Settings>("Settings")
    .value("retries", |s: &mut Settings, v: i32| s.retries = v)
    .value("level", |s: &mut Settings, v: i8| s.level = v)
    .value("window", |s: &mut Settings, v: i16| s.window = v)
    .value("budget", |s: &mut Settings, v: i64| s.budget = v)
    .value("enabled", |s: &mut Settings, v: bool| s.enabled = v)
    .value("label", |s: &mut Settings, v: String| s.label = v);
  registry
}

// --- Extensions ---

/// Shared log extensions write into, so tests can inspect what they saw.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
  Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
  journal.lock().unwrap().clone()
}

/// Renames the type of every definition it sees.
pub struct RenameTypes {
  pub to: String,
  pub journal: Journal,
}

impl DefinitionRewriter for RenameTypes {
  fn rewrite(&mut self, definitions: &mut [ObjectDefinition]) -> Result<(), BoxError> {
    for definition in definitions.iter_mut() {
      self
        .journal
        .lock()
        .unwrap()
        .push(format!("rename {}:{}", definition.id(), definition.type_name));
      definition.type_name = self.to.clone();
    }
    Ok(())
  }
}

/// Records the port of every `MailService` it sees before and after init.
pub struct PortProbe {
  pub journal: Journal,
}

impl InstanceRewriter for PortProbe {
  fn before_init(&mut self, value: BoxedObject, id: &str) -> Result<BoxedObject, BoxError> {
    if let Some(mail) = value.downcast_ref::<MailService>() {
      self.journal.lock().unwrap().push(format!("before {}={}", id, mail.port));
    }
    Ok(value)
  }

  fn after_init(&mut self, value: BoxedObject, id: &str) -> Result<BoxedObject, BoxError> {
    if let Some(mail) = value.downcast_ref::<MailService>() {
      self.journal.lock().unwrap().push(format!("after {}={}", id, mail.port));
    }
    Ok(value)
  }
}

/// Marks every `UserService` as processed after init.
#[derive(Default)]
pub struct MarkProcessed;

impl InstanceRewriter for MarkProcessed {
  fn after_init(&mut self, mut value: BoxedObject, _id: &str) -> Result<BoxedObject, BoxError> {
    if let Some(user) = value.downcast_mut::<UserService>() {
      user.processed = true;
    }
    Ok(value)
  }
}
