use fibre_context::{resolve, Container, TypeRegistry, YamlSource};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// --- Services ---

#[derive(Default)]
struct UserService {
  users: Vec<String>,
}

impl UserService {
  fn lookup(&self, name: &str) -> Option<&str> {
    self.users.iter().map(String::as_str).find(|u| *u == name)
  }
}

#[derive(Default)]
struct MailService {
  protocol: String,
  port: u16,
  users: Option<Arc<UserService>>,
}

impl MailService {
  fn deliver(&self, to: &str, body: &str) -> String {
    let known = self.users.as_ref().and_then(|u| u.lookup(to)).is_some();
    if known {
      format!("[{}:{}] to {}: '{}'", self.protocol, self.port, to, body)
    } else {
      format!("[{}:{}] rejected unknown recipient {}", self.protocol, self.port, to)
    }
  }
}

const DEFINITIONS: &str = r#"
objects:
  - id: mailService
    type: MailService
    values:
      protocol: POP3
      port: 3000
    refs:
      users: userService
  - id: userService
    type: UserService
"#;

fn main() {
  // RUST_LOG=fibre_context=debug shows each bootstrap stage.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Registration ---
  let mut registry = TypeRegistry::new();
  registry
    .register::<UserService>("UserService")
    .init(|service| service.users = vec!["alice".to_owned(), "bob".to_owned()]);
  registry
    .register::<MailService>("MailService")
    .value("protocol", |m: &mut MailService, v: String| m.protocol = v)
    .value("port", |m: &mut MailService, v: u16| m.port = v)
    .reference("users", |m: &mut MailService, u: Arc<UserService>| m.users = Some(u));

  // --- Bootstrap ---
  let container = match Container::build(&registry, &YamlSource::inline(DEFINITIONS)) {
    Ok(container) => container,
    Err(e) => {
      eprintln!("Failed to build container: {}", e);
      std::process::exit(1);
    }
  };

  // --- Resolution ---
  let mail = resolve!(container, MailService);
  let users = resolve!(container, UserService, "userService");

  println!("objects: {:?}", container.list_ids());
  println!("{}", mail.deliver("alice", "Hello from Fibre!"));
  println!("{}", mail.deliver("mallory", "Hello from Fibre!"));

  assert!(Arc::ptr_eq(mail.users.as_ref().unwrap(), &users));
}
