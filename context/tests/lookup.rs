mod common;

use common::*;
use fibre_context::{
  resolve, Container, Error, InMemorySource, ObjectDefinition, Query, TypeRegistry,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

/// Records its label into a journal when it is released.
struct Tracked {
  label: String,
  journal: Journal,
}

impl Drop for Tracked {
  fn drop(&mut self) {
    if let Ok(mut entries) = self.journal.lock() {
      entries.push(format!("released {}", self.label));
    }
  }
}

fn two_users() -> Container {
  let registry = base_registry();
  let source = InMemorySource::new()
    .with(ObjectDefinition::new("admins", "UserService").with_value("name", "admins"))
    .with(ObjectDefinition::new("guests", "UserService").with_value("name", "guests"))
    .with(ObjectDefinition::new("mailService", "MailService").with_ref("users", "guests"));
  Container::build(&registry, &source).unwrap()
}

#[test]
fn test_get_by_id_returns_the_shared_instance() {
  // Arrange
  let container = two_users();

  // Act
  let first = container.get_by_id("admins").unwrap();
  let second = container.get_by_id("admins").unwrap();

  // Assert
  assert!(Arc::ptr_eq(&first, &second));
  let users = first.downcast_ref::<UserService>().unwrap();
  assert_eq!(users.name, "admins");
}

#[test]
fn test_get_by_id_unknown_fails() {
  let container = two_users();

  let result = container.get_by_id("operators");

  match result {
    Err(Error::NoSuchDefinition(Query { id, type_name })) => {
      assert_eq!(id.as_deref(), Some("operators"));
      assert_eq!(type_name, None);
    }
    other => panic!("unexpected result: {:?}", other.map(|_| ())),
  }
}

#[test]
fn test_get_by_type_with_several_matches_fails() {
  let container = two_users();

  let result = container.get_by_type::<UserService>();

  assert!(matches!(result, Err(Error::NonUniqueType { count: 2, .. })));
}

#[test]
fn test_get_by_type_without_match_fails() {
  let container = two_users();

  let result = container.get_by_type::<Settings>();

  assert!(matches!(result, Err(Error::NoSuchDefinition(Query { id: None, .. }))));
}

#[test]
fn test_get_by_id_and_type_disambiguates() {
  // Arrange
  let container = two_users();

  // Act
  let guests = container.get_by_id_and_type::<UserService>("guests").unwrap();
  let mail = container.get_by_type::<MailService>().unwrap();

  // Assert
  assert_eq!(guests.name, "guests");
  assert!(Arc::ptr_eq(mail.users.as_ref().unwrap(), &guests));
}

#[test]
fn test_get_by_id_and_type_with_wrong_type_fails() {
  let container = two_users();

  let result = container.get_by_id_and_type::<MailService>("guests");

  match result {
    Err(Error::NoSuchDefinition(query)) => {
      assert_eq!(query.id.as_deref(), Some("guests"));
      assert!(query.type_name.unwrap().ends_with("MailService"));
    }
    other => panic!("unexpected result: {:?}", other.map(|_| ())),
  }
}

#[test]
fn test_list_ids_keeps_definition_order() {
  let container = two_users();

  assert_eq!(container.list_ids(), vec!["admins", "guests", "mailService"]);
  assert_eq!(container.len(), 3);
  assert!(container.contains("guests"));
  assert!(!container.contains("operators"));
}

#[test]
fn test_list_ids_skips_extensions() {
  // Arrange
  let mut registry = base_registry();
  registry.register::<MarkProcessed>("MarkProcessed").instance_rewriter();
  let source = InMemorySource::new()
    .with(ObjectDefinition::new("marker", "MarkProcessed"))
    .with(ObjectDefinition::new("userService", "UserService"));

  // Act
  let container = Container::build(&registry, &source).unwrap();

  // Assert
  assert_eq!(container.list_ids(), vec!["userService"]);
  assert!(container.definition("marker").is_none());
  assert!(matches!(container.get_by_id("marker"), Err(Error::NoSuchDefinition(_))));
}

#[test]
fn test_definition_is_exposed_after_rewriting() {
  // Arrange
  let log = journal();
  let mut registry = base_registry();
  registry
    .register_with("Rename", move || RenameTypes {
      to: "Settings".to_owned(),
      journal: log.clone(),
    })
    .definition_rewriter();
  let source = InMemorySource::new()
    .with(ObjectDefinition::new("rename", "Rename"))
    .with(ObjectDefinition::new("config", "UserService"));

  // Act
  let container = Container::build(&registry, &source).unwrap();

  // Assert
  let definition = container.definition("config").unwrap();
  assert_eq!(definition.id(), "config");
  assert_eq!(definition.type_name(), "Settings");
  assert!(container.get_by_id_and_type::<Settings>("config").is_ok());
}

#[test]
fn test_empty_container() {
  let registry = base_registry();

  let container = Container::from_definitions(&registry, Vec::<ObjectDefinition>::new()).unwrap();

  assert!(container.is_empty());
  assert!(container.list_ids().is_empty());
}

#[test]
fn test_lookups_from_many_threads() {
  // Arrange
  let container = two_users();
  let expected = container.get_by_id_and_type::<UserService>("admins").unwrap();

  let shared = &container;

  // Act
  let seen: Vec<Arc<UserService>> = thread::scope(|scope| {
    let handles: Vec<_> = (0..4)
      .map(|_| scope.spawn(move || shared.get_by_id_and_type::<UserService>("admins").unwrap()))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  // Assert
  assert!(seen.iter().all(|users| Arc::ptr_eq(users, &expected)));
}

// --- Teardown ---

#[test]
fn test_dropping_container_releases_in_reverse_definition_order() {
  // Arrange
  let log = journal();
  let mut registry = TypeRegistry::new();
  let factory_log = log.clone();
  registry
    .register_with("Tracked", move || Tracked {
      label: String::new(),
      journal: factory_log.clone(),
    })
    .value("label", |t: &mut Tracked, label: String| t.label = label);
  let source = InMemorySource::new()
    .with(ObjectDefinition::new("first", "Tracked").with_value("label", "first"))
    .with(ObjectDefinition::new("second", "Tracked").with_value("label", "second"))
    .with(ObjectDefinition::new("third", "Tracked").with_value("label", "third"));
  let container = Container::build(&registry, &source).unwrap();
  // Probe instances were released during the build.
  log.lock().unwrap().clear();

  // Act
  drop(container);

  // Assert
  assert_eq!(
    entries(&log),
    vec![
      "released third".to_string(),
      "released second".to_string(),
      "released first".to_string(),
    ]
  );
}

// --- resolve! ---

#[test]
fn test_resolve_by_type_and_by_id() {
  let container = two_users();

  let mail = resolve!(container, MailService);
  let admins = resolve!(container, UserService, "admins");

  assert_eq!(mail.port, 5);
  assert_eq!(admins.name, "admins");
}

#[test]
#[should_panic(expected = "Failed to resolve required object")]
fn test_resolve_panics_on_ambiguous_type() {
  let container = two_users();

  let _users = resolve!(container, UserService);
}

#[test]
#[should_panic(expected = "Failed to resolve required object 'operators'")]
fn test_resolve_panics_on_unknown_id() {
  let container = two_users();

  let _users = resolve!(container, UserService, "operators");
}
