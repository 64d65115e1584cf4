//! # Fibre Context
//!
//! A staged, definition-driven Inversion of Control (IoC) container for Rust.
//!
//! Objects are described by [`ObjectDefinition`]s (an id, a type name, literal
//! values and references to other objects) and built in a single pass when a
//! [`Container`] is constructed. Every object is a singleton that lives as
//! long as the container.
//!
//! ## Core Concepts
//!
//! - **TypeRegistry**: The table mapping type names to factories, and Rust
//!   types to their setters, initializers and extension roles.
//! - **Definitions**: Produced by a [`DefinitionSource`], such as
//!   [`InMemorySource`] or a YAML file.
//! - **Extensions**: Objects whose type implements [`DefinitionRewriter`] or
//!   [`InstanceRewriter`]. They rewrite the other objects during bootstrap
//!   and are not part of the finished container.
//! - **Bootstrap**: instantiate, partition extensions, rewrite definitions,
//!   re-instantiate, before-init hooks, initializers, after-init hooks,
//!   strip extensions, inject values, inject references.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_context::{Container, InMemorySource, ObjectDefinition, TypeRegistry};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct UserService;
//!
//! #[derive(Default)]
//! struct MailService {
//!   protocol: String,
//!   port: i32,
//!   users: Option<Arc<UserService>>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<UserService>("UserService");
//! registry
//!   .register::<MailService>("MailService")
//!   .value("protocol", |m: &mut MailService, v: String| m.protocol = v)
//!   .value("port", |m: &mut MailService, v: i32| m.port = v)
//!   .reference("users", |m: &mut MailService, u: Arc<UserService>| m.users = Some(u))
//!   .init(|m| m.port *= 2);
//!
//! let source = InMemorySource::new()
//!   .with(ObjectDefinition::new("userService", "UserService"))
//!   .with(
//!     ObjectDefinition::new("mailService", "MailService")
//!       .with_value("protocol", "POP3")
//!       .with_value("port", "3000")
//!       .with_ref("users", "userService"),
//!   );
//!
//! let container = Container::build(&registry, &source).unwrap();
//!
//! let mail = container.get_by_type::<MailService>().unwrap();
//! let users = container.get_by_id_and_type::<UserService>("userService").unwrap();
//! assert_eq!(mail.protocol, "POP3");
//! // Initializers run before injection, so the injected port is kept as is.
//! assert_eq!(mail.port, 3000);
//! assert!(Arc::ptr_eq(mail.users.as_ref().unwrap(), &users));
//! ```

mod container;
mod core;
mod definition;
mod error;
mod extension;
mod inject;
mod instantiate;
mod literal;
mod macros;
mod pipeline;
mod registry;
mod source;

pub use crate::core::{BoxError, BoxedObject, SharedObject, Stage};
pub use container::Container;
pub use definition::{collect_definitions, Definitions, ObjectDefinition};
pub use error::{Error, InjectionFailure, InstantiationFailure, LiteralError, Query, Result};
pub use extension::{DefinitionRewriter, InstanceRewriter};
pub use literal::FromLiteral;
pub use registry::{TypeBuilder, TypeRegistry};
#[cfg(feature = "yaml")]
pub use source::YamlSource;
pub use source::{DefinitionSource, InMemorySource};
