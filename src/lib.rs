//! # Tessera
//!
//! Plan-driven dependency injection.
//!
//! Tessera resolves a pre-built request tree (a [`Plan`]) into a value,
//! applying each binding's strategy, scope and activation hook on the way.
//! The engine lives in [`tessera_di`]; this crate re-exports it.
//!
//! ## Feature Flags
//!
//! - `dev-tools` - Plan visualization in DOT format
//!
//! ## Quick Example
//!
//! ```rust
//! use tessera::{Binding, Context, Plan, Target, instance, resolve_as};
//!
//! let port = Binding::builder("Port").to_constant_value(instance(8080u16));
//! let plan = Plan::new("Port", Some(Target::variable("Port")), vec![port]);
//!
//! let port = resolve_as::<u16>(&Context::new(plan)).unwrap();
//! assert_eq!(*port, 8080);
//! ```

pub use tessera_di as di;
pub use tessera_di::*;
