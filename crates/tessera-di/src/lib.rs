//! # Tessera Dependency Injection
//!
//! Resolution engine for request trees.
//!
//! A planner turns "give me `X`" plus the binding registry into a [`Plan`]:
//! a tree of [`Request`] nodes, each carrying the bindings that can satisfy
//! it and the child requests its value depends on. This crate walks that
//! tree and produces the value.
//!
//! ## Features
//!
//! - **Strategies**: constant values, functions, type descriptors, dynamic
//!   values, factories, providers and constructor/property injection
//! - **Scoped**: transient, singleton (cached on the binding) and request
//!   (cached for one root resolution) lifetimes
//! - **Arrays**: multi-injection aggregates child requests in declared order
//! - **Optional**: unbound optional requests resolve to [`Resolved::Absent`]
//! - **Activation hooks**: every freshly built value can be wrapped
//! - **Guarded**: circular constructions and runaway depth fail cleanly
//!
//! ## Development Tools (dev-tools feature)
//!
//! - **Visualization**: render a plan in DOT format for Graphviz
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera_di::{Binding, Context, ImplementationType, Plan, Target, resolve_as};
//!
//! #[derive(Default)]
//! struct Logger;
//!
//! struct Service {
//!     first: Arc<Logger>,
//!     second: Arc<Logger>,
//! }
//!
//! let logger = Binding::builder("Logger")
//!     .in_request_scope()
//!     .to_instance(ImplementationType::of_default::<Logger>());
//! let service = Binding::builder("Service").to_instance(
//!     ImplementationType::builder::<Service, _>(2, |args| {
//!         Ok(Service {
//!             first: args.required(0)?,
//!             second: args.required(1)?,
//!         })
//!     })
//!     .build(),
//! );
//!
//! let mut plan = Plan::new("Service", Some(Target::variable("Service")), vec![service]);
//! let root = plan.root();
//! plan.add_child(root, "Logger", Some(Target::argument("Logger")), vec![logger.clone()]).unwrap();
//! plan.add_child(root, "Logger", Some(Target::argument("Logger")), vec![logger]).unwrap();
//!
//! let service = resolve_as::<Service>(&Context::new(plan)).unwrap();
//! assert!(Arc::ptr_eq(&service.first, &service.second));
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod cycle_detection;
pub mod error;
pub mod identifier;
pub mod instantiation;
pub mod request;
pub mod resolver;
pub mod scope;
pub mod target;
pub mod value;

// Development tools
#[cfg(feature = "dev-tools")]
pub mod visualization;

pub use binding::{ActivationFn, Binding, BindingBuilder, BindingId, BindingKind, ValueFn};
pub use config::ResolverConfig;
pub use context::Context;
pub use cycle_detection::{CycleDetector, CycleError, ResolutionGuard};
pub use error::{ConstructionError, DiError, DiResult};
pub use identifier::{ServiceIdentifier, Symbol};
pub use instantiation::{Arguments, ImplementationBuilder, ImplementationType, construct};
pub use request::{Plan, Request, RequestId};
pub use resolver::{Resolver, resolve, resolve_all, resolve_as, resolve_optional};
pub use scope::{BindingScope, RequestScope};
pub use target::{Target, TargetKind};
pub use value::{Instance, Resolved, instance};
