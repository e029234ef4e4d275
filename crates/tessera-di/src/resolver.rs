//! Resolution engine
//!
//! Walks a [`Plan`](crate::Plan) depth-first and produces the value for its
//! root request. Per request node:
//!
//! 1. An array target that is not the echo of its parent's array request
//!    aggregates its children, in order, into a [`Resolved::Sequence`]
//! 2. An optional target without bindings yields [`Resolved::Absent`]
//! 3. Otherwise the first binding is used: Singleton and Request-scoped
//!    cache hits return immediately, misses are built by the binding's
//!    strategy, passed through its activation hook and stored in the
//!    matching cache
//!
//! ```
//! use tessera_di::{Binding, Context, Plan, Target, instance, resolve_as};
//!
//! let port = Binding::builder("Port").to_constant_value(instance(8080u16));
//! let plan = Plan::new("Port", Some(Target::variable("Port")), vec![port]);
//!
//! assert_eq!(*resolve_as::<u16>(&Context::new(plan)).unwrap(), 8080);
//! ```

use crate::binding::{Binding, BindingKind};
use crate::config::ResolverConfig;
use crate::context::Context;
use crate::cycle_detection::CycleDetector;
use crate::error::{DiError, DiResult};
use crate::instantiation::construct;
use crate::request::{Request, RequestId};
use crate::scope::{BindingScope, RequestScope};
use crate::target::Target;
use crate::value::{Instance, Resolved};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves the root request of `context` with the default configuration.
pub fn resolve(context: &Context) -> DiResult<Resolved> {
	Resolver::default().resolve(context)
}

/// Resolves the root request and downcasts the single value to `T`.
pub fn resolve_as<T: Any + Send + Sync>(context: &Context) -> DiResult<Arc<T>> {
	Resolver::default().resolve_as(context)
}

/// Like [`resolve_as`], mapping the absent marker to `None`.
pub fn resolve_optional<T: Any + Send + Sync>(context: &Context) -> DiResult<Option<Arc<T>>> {
	Resolver::default().resolve_optional(context)
}

/// Resolves an array root request into its elements.
pub fn resolve_all<T: Any + Send + Sync>(context: &Context) -> DiResult<Vec<Arc<T>>> {
	Resolver::default().resolve_all(context)
}

/// Resolution engine. Holds no state between calls besides its
/// configuration; Singleton values live on their bindings and
/// Request-scoped values on the call.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
	config: ResolverConfig,
}

impl Resolver {
	pub fn new(config: ResolverConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	/// Resolves the root request of `context`.
	///
	/// Every call gets its own request scope, so Request-scoped values are
	/// shared within the call and never across calls.
	///
	/// The shape of the result is decided by the root target: a sequence for
	/// array targets, the absent marker for optional unbound targets, a
	/// single value otherwise.
	pub fn resolve(&self, context: &Context) -> DiResult<Resolved> {
		let request_scope = context.plan().is_request_scoped().then(RequestScope::new);
		let resolution = Resolution {
			context,
			request_scope: request_scope.as_ref(),
			detector: CycleDetector::new(&self.config),
		};
		resolution.resolve_request(context.plan().root())
	}

	pub fn resolve_as<T: Any + Send + Sync>(&self, context: &Context) -> DiResult<Arc<T>> {
		match self.resolve(context)? {
			Resolved::Value(value) => downcast_value(context, value),
			_ => Err(type_mismatch::<T>(context)),
		}
	}

	pub fn resolve_optional<T: Any + Send + Sync>(
		&self,
		context: &Context,
	) -> DiResult<Option<Arc<T>>> {
		match self.resolve(context)? {
			Resolved::Absent => Ok(None),
			Resolved::Value(value) => downcast_value(context, value).map(Some),
			Resolved::Sequence(_) => Err(type_mismatch::<T>(context)),
		}
	}

	pub fn resolve_all<T: Any + Send + Sync>(&self, context: &Context) -> DiResult<Vec<Arc<T>>> {
		match self.resolve(context)? {
			Resolved::Sequence(items) => items
				.into_iter()
				.map(|item| match item {
					Resolved::Value(value) => downcast_value(context, value),
					_ => Err(type_mismatch::<T>(context)),
				})
				.collect(),
			_ => Err(type_mismatch::<Vec<T>>(context)),
		}
	}
}

fn downcast_value<T: Any + Send + Sync>(context: &Context, value: Instance) -> DiResult<Arc<T>> {
	value.downcast::<T>().map_err(|_| type_mismatch::<T>(context))
}

fn type_mismatch<T>(context: &Context) -> DiError {
	DiError::TypeMismatch {
		identifier: context.plan().root_request().service_identifier().to_string(),
		expected: std::any::type_name::<T>(),
	}
}

/// State of one root resolution
struct Resolution<'a> {
	context: &'a Context,
	request_scope: Option<&'a RequestScope>,
	detector: CycleDetector,
}

impl Resolution<'_> {
	fn resolve_request(&self, id: RequestId) -> DiResult<Resolved> {
		let _depth = self.detector.enter()?;
		let plan = self.context.plan();
		let request = plan.request(id)?;
		trace!(
			identifier = %request.service_identifier(),
			request = %id,
			"resolving request"
		);

		if plan.is_array_boundary(id)? {
			return request
				.children()
				.iter()
				.map(|&child| self.resolve_request(child))
				.collect::<DiResult<Vec<_>>>()
				.map(Resolved::Sequence);
		}

		let Some(binding) = request.bindings().first() else {
			if request.target().is_some_and(Target::is_optional) {
				trace!(identifier = %request.service_identifier(), "optional request has no binding");
				return Ok(Resolved::Absent);
			}
			return Err(DiError::NoMatchingBindings(
				request.service_identifier().to_string(),
			));
		};

		if let Some(cached) = self.cached(binding) {
			trace!(
				identifier = %request.service_identifier(),
				scope = binding.scope().as_str(),
				"cache hit"
			);
			return Ok(Resolved::Value(cached));
		}

		let value = self
			.build(request, binding)
			.and_then(|value| match binding.on_activation() {
				Some(hook) => hook(self.context, value),
				None => Ok(value),
			})
			.map_err(|e| {
				debug!(
					identifier = %request.service_identifier(),
					binding_type = binding.kind().name(),
					"dependency resolution failed"
				);
				e
			})?;

		match binding.scope() {
			BindingScope::Singleton => {
				binding.activate(value.clone());
				debug!(identifier = %request.service_identifier(), "singleton activated");
			}
			BindingScope::Request => {
				let stored = self
					.request_scope
					.is_some_and(|scope| scope.insert_if_absent(binding.id(), value.clone()));
				if stored {
					debug!(identifier = %request.service_identifier(), "request-scoped value cached");
				}
			}
			BindingScope::Transient => {}
		}

		Ok(Resolved::Value(value))
	}

	fn cached(&self, binding: &Binding) -> Option<Instance> {
		match binding.scope() {
			BindingScope::Singleton => binding.cached(),
			BindingScope::Request => self.request_scope?.get(&binding.id()),
			BindingScope::Transient => None,
		}
	}

	fn build(&self, request: &Request, binding: &Binding) -> DiResult<Instance> {
		debug!(
			identifier = %request.service_identifier(),
			binding_type = binding.kind().name(),
			"constructing value"
		);
		match binding.kind() {
			BindingKind::ConstantValue(value) | BindingKind::Function(value) => Ok(value.clone()),
			BindingKind::Constructor(implementation) => Ok(Arc::new(implementation.clone()) as Instance),
			BindingKind::DynamicValue(f) | BindingKind::Factory(f) | BindingKind::Provider(f) => {
				f(self.context)
			}
			BindingKind::Instance(implementation) => {
				let _guard = self
					.detector
					.begin_construction(binding.id(), request.service_identifier())?;
				construct(
					implementation,
					self.context.plan(),
					request.children(),
					|child| self.resolve_request(child),
				)
			}
			// The binding was declared but never finished with a strategy
			BindingKind::Unfinished => Err(DiError::InvalidBindingType(
				request.service_identifier().to_string(),
			)),
		}
	}
}
