//! Bindings: registered recipes mapping a service identifier to a
//! construction strategy and a lifetime scope.
//!
//! Bindings are owned by the registry and shared by reference across
//! resolutions. The engine mutates a binding only to store the value of a
//! Singleton after its first activation.

use crate::context::Context;
use crate::error::DiResult;
use crate::identifier::ServiceIdentifier;
use crate::instantiation::ImplementationType;
use crate::scope::BindingScope;
use crate::value::Instance;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Callback producing a value from the resolution context
pub type ValueFn = Arc<dyn Fn(&Context) -> DiResult<Instance> + Send + Sync>;

/// Post-construction hook that may replace or wrap a fresh value
pub type ActivationFn = Arc<dyn Fn(&Context, Instance) -> DiResult<Instance> + Send + Sync>;

/// Globally unique binding identity, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(Uuid);

impl BindingId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for BindingId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for BindingId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Construction strategy, one variant per binding type.
#[derive(Clone)]
pub enum BindingKind {
	/// Declared without a strategy (`bind` never followed by `to...`)
	Unfinished,
	/// Precomputed value, returned verbatim
	ConstantValue(Instance),
	/// Function value, returned verbatim rather than called
	Function(Instance),
	/// The type descriptor itself, not instantiated
	Constructor(ImplementationType),
	/// A fresh instance built by the instance constructor
	Instance(ImplementationType),
	DynamicValue(ValueFn),
	Factory(ValueFn),
	/// Producer of deferred values; invoked synchronously like a factory
	Provider(ValueFn),
}

impl BindingKind {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Unfinished => "Invalid",
			Self::ConstantValue(_) => "ConstantValue",
			Self::Function(_) => "Function",
			Self::Constructor(_) => "Constructor",
			Self::Instance(_) => "Instance",
			Self::DynamicValue(_) => "DynamicValue",
			Self::Factory(_) => "Factory",
			Self::Provider(_) => "Provider",
		}
	}
}

impl fmt::Debug for BindingKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constructor(ty) | Self::Instance(ty) => {
				write!(f, "{}({})", self.name(), ty.name())
			}
			_ => f.write_str(self.name()),
		}
	}
}

pub struct Binding {
	id: BindingId,
	service_identifier: ServiceIdentifier,
	scope: BindingScope,
	kind: BindingKind,
	on_activation: Option<ActivationFn>,
	/// Singleton value; `Some` once activated
	cache: RwLock<Option<Instance>>,
}

impl Binding {
	/// Starts building a binding for `identifier`.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::{Binding, BindingScope, instance};
	///
	/// let binding = Binding::builder("Port")
	///     .in_singleton_scope()
	///     .to_constant_value(instance(8080u16));
	///
	/// assert_eq!(binding.scope(), BindingScope::Singleton);
	/// assert!(!binding.is_activated());
	/// ```
	pub fn builder(identifier: impl Into<ServiceIdentifier>) -> BindingBuilder {
		BindingBuilder {
			service_identifier: identifier.into(),
			scope: BindingScope::default(),
			on_activation: None,
		}
	}

	/// Creates a binding that was never given a construction strategy.
	pub fn unfinished(identifier: impl Into<ServiceIdentifier>, scope: BindingScope) -> Arc<Self> {
		Arc::new(Self::new(identifier.into(), scope, BindingKind::Unfinished, None))
	}

	fn new(
		service_identifier: ServiceIdentifier,
		scope: BindingScope,
		kind: BindingKind,
		on_activation: Option<ActivationFn>,
	) -> Self {
		Self {
			id: BindingId::new(),
			service_identifier,
			scope,
			kind,
			on_activation,
			cache: RwLock::new(None),
		}
	}

	pub fn id(&self) -> BindingId {
		self.id
	}

	pub fn service_identifier(&self) -> &ServiceIdentifier {
		&self.service_identifier
	}

	pub fn scope(&self) -> BindingScope {
		self.scope
	}

	pub fn kind(&self) -> &BindingKind {
		&self.kind
	}

	pub fn on_activation(&self) -> Option<&ActivationFn> {
		self.on_activation.as_ref()
	}

	/// Whether a Singleton value has been stored.
	pub fn is_activated(&self) -> bool {
		self.cache
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.is_some()
	}

	/// The stored Singleton value, if activated.
	pub fn cached(&self) -> Option<Instance> {
		self.cache
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Stores the Singleton value and marks the binding activated.
	///
	/// Concurrent first activations race; the last writer wins.
	pub(crate) fn activate(&self, value: Instance) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		*cache = Some(value);
	}
}

impl fmt::Debug for Binding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("id", &self.id)
			.field("service_identifier", &self.service_identifier)
			.field("scope", &self.scope)
			.field("kind", &self.kind)
			.field("activated", &self.is_activated())
			.finish()
	}
}

/// Builder returned by [`Binding::builder`]. Each `to_*` method finishes the
/// binding with one construction strategy.
pub struct BindingBuilder {
	service_identifier: ServiceIdentifier,
	scope: BindingScope,
	on_activation: Option<ActivationFn>,
}

impl BindingBuilder {
	pub fn in_scope(mut self, scope: BindingScope) -> Self {
		self.scope = scope;
		self
	}

	pub fn in_singleton_scope(self) -> Self {
		self.in_scope(BindingScope::Singleton)
	}

	pub fn in_request_scope(self) -> Self {
		self.in_scope(BindingScope::Request)
	}

	pub fn in_transient_scope(self) -> Self {
		self.in_scope(BindingScope::Transient)
	}

	pub fn on_activation<F>(mut self, hook: F) -> Self
	where
		F: Fn(&Context, Instance) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.on_activation = Some(Arc::new(hook));
		self
	}

	pub fn to(self, kind: BindingKind) -> Arc<Binding> {
		Arc::new(Binding::new(
			self.service_identifier,
			self.scope,
			kind,
			self.on_activation,
		))
	}

	pub fn to_constant_value(self, value: Instance) -> Arc<Binding> {
		self.to(BindingKind::ConstantValue(value))
	}

	pub fn to_function(self, function: Instance) -> Arc<Binding> {
		self.to(BindingKind::Function(function))
	}

	pub fn to_constructor(self, implementation: ImplementationType) -> Arc<Binding> {
		self.to(BindingKind::Constructor(implementation))
	}

	pub fn to_instance(self, implementation: ImplementationType) -> Arc<Binding> {
		self.to(BindingKind::Instance(implementation))
	}

	pub fn to_dynamic_value<F>(self, f: F) -> Arc<Binding>
	where
		F: Fn(&Context) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.to(BindingKind::DynamicValue(Arc::new(f)))
	}

	pub fn to_factory<F>(self, f: F) -> Arc<Binding>
	where
		F: Fn(&Context) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.to(BindingKind::Factory(Arc::new(f)))
	}

	pub fn to_provider<F>(self, f: F) -> Arc<Binding>
	where
		F: Fn(&Context) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.to(BindingKind::Provider(Arc::new(f)))
	}
}
