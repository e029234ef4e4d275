//! Instance constructor
//!
//! Builds a concrete value from an [`ImplementationType`] and the child
//! requests of the node that asked for it. Constructor arguments are resolved
//! in declared order right before the constructor runs; property children
//! are resolved one at a time afterwards and handed to their setters.
//!
//! ```
//! use std::sync::Arc;
//! use tessera_di::{Binding, Context, ImplementationType, Plan, Target, resolve_as};
//!
//! #[derive(Default)]
//! struct Katana;
//! struct Ninja {
//!     katana: Arc<Katana>,
//! }
//!
//! let katana = Binding::builder("Katana").to_instance(ImplementationType::of_default::<Katana>());
//! let ninja = Binding::builder("Ninja").to_instance(
//!     ImplementationType::builder::<Ninja, _>(1, |args| {
//!         Ok(Ninja { katana: args.required::<Katana>(0)? })
//!     })
//!     .build(),
//! );
//!
//! let mut plan = Plan::new("Ninja", Some(Target::variable("Ninja")), vec![ninja]);
//! plan.add_child(plan.root(), "Katana", Some(Target::argument("Katana")), vec![katana]).unwrap();
//!
//! let ninja = resolve_as::<Ninja>(&Context::new(plan)).unwrap();
//! # let _ = &ninja.katana;
//! ```
//!
//! Implementing `Default` is enough for types without dependencies:
//!
//! ```
//! use tessera_di::ImplementationType;
//!
//! #[derive(Default)]
//! struct Logger;
//!
//! let logger = ImplementationType::of_default::<Logger>();
//! assert_eq!(logger.arity(), 0);
//! ```

use crate::error::{ConstructionError, DiError, DiResult};
use crate::request::{Plan, RequestId};
use crate::target::TargetKind;
use crate::value::{Instance, Resolved};
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type AnyValue = dyn Any + Send + Sync;
type Boxed = Box<AnyValue>;
type ConstructorFn = Arc<dyn Fn(&Arguments) -> DiResult<Boxed> + Send + Sync>;
type PropertyFn = Arc<dyn Fn(&mut AnyValue, Resolved) -> DiResult<()> + Send + Sync>;
type PostConstructFn = Arc<dyn Fn(&mut AnyValue) -> DiResult<()> + Send + Sync>;

struct ImplementationInner {
	name: &'static str,
	type_id: TypeId,
	arity: usize,
	constructor: ConstructorFn,
	properties: Vec<(String, PropertyFn)>,
	post_construct: Option<PostConstructFn>,
}

/// Descriptor of a constructible type. Cloning is cheap.
#[derive(Clone)]
pub struct ImplementationType {
	inner: Arc<ImplementationInner>,
}

impl ImplementationType {
	/// Starts describing `T`, built by `constructor` from `arity` positional
	/// arguments.
	pub fn builder<T, F>(arity: usize, constructor: F) -> ImplementationBuilder<T>
	where
		T: Any + Send + Sync,
		F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
	{
		let constructor: ConstructorFn = Arc::new(move |args: &Arguments| {
			constructor(args).map(|value| Box::new(value) as Boxed)
		});
		ImplementationBuilder {
			arity,
			constructor,
			properties: Vec::new(),
			post_construct: None,
			_marker: PhantomData,
		}
	}

	/// Describes a dependency-free type built with `Default::default()`.
	pub fn of_default<T: Default + Any + Send + Sync>() -> Self {
		Self::builder::<T, _>(0, |_| Ok(T::default())).build()
	}

	pub fn name(&self) -> &'static str {
		self.inner.name
	}

	pub fn type_id(&self) -> TypeId {
		self.inner.type_id
	}

	/// Number of positional constructor arguments.
	pub fn arity(&self) -> usize {
		self.inner.arity
	}

	/// Names of the injectable properties, in declaration order.
	pub fn property_names(&self) -> impl Iterator<Item = &str> {
		self.inner.properties.iter().map(|(name, _)| name.as_str())
	}

	fn property(&self, name: &str) -> Option<&PropertyFn> {
		self.inner
			.properties
			.iter()
			.find(|(declared, _)| declared == name)
			.map(|(_, setter)| setter)
	}
}

impl PartialEq for ImplementationType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for ImplementationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImplementationType")
			.field("name", &self.inner.name)
			.field("arity", &self.inner.arity)
			.field("properties", &self.property_names().collect::<Vec<_>>())
			.finish()
	}
}

pub struct ImplementationBuilder<T> {
	arity: usize,
	constructor: ConstructorFn,
	properties: Vec<(String, PropertyFn)>,
	post_construct: Option<PostConstructFn>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ImplementationBuilder<T> {
	/// Declares an injectable property.
	pub fn property<F>(mut self, name: impl Into<String>, setter: F) -> Self
	where
		F: Fn(&mut T, Resolved) -> DiResult<()> + Send + Sync + 'static,
	{
		let name = name.into();
		let property = name.clone();
		let setter: PropertyFn = Arc::new(
			move |this: &mut AnyValue, value: Resolved| match this.downcast_mut::<T>() {
				Some(this) => setter(this, value),
				None => Err(DiError::from(ConstructionError::PropertyType {
					type_name: std::any::type_name::<T>(),
					property: property.clone(),
					reason: "instance is not of the declared type".to_string(),
				})),
			},
		);
		self.properties.push((name, setter));
		self
	}

	/// Hook run once the constructor and every property setter succeeded.
	pub fn post_construct<F>(mut self, hook: F) -> Self
	where
		F: Fn(&mut T) -> DiResult<()> + Send + Sync + 'static,
	{
		let hook: PostConstructFn = Arc::new(move |this: &mut AnyValue| {
			match this.downcast_mut::<T>() {
				Some(this) => hook(this),
				None => Ok(()),
			}
		});
		self.post_construct = Some(hook);
		self
	}

	pub fn build(self) -> ImplementationType {
		ImplementationType {
			inner: Arc::new(ImplementationInner {
				name: std::any::type_name::<T>(),
				type_id: TypeId::of::<T>(),
				arity: self.arity,
				constructor: self.constructor,
				properties: self.properties,
				post_construct: self.post_construct,
			}),
		}
	}
}

/// Positional constructor arguments, already resolved.
///
/// Absent arguments stay absent: [`Arguments::required`] fails on them and
/// [`Arguments::optional`] maps them to `None`.
pub struct Arguments {
	type_name: &'static str,
	values: Vec<Resolved>,
}

impl Arguments {
	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Resolved> {
		self.values.get(index)
	}

	pub fn required<U: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<U>> {
		self.optional::<U>(index)?.ok_or_else(|| {
			ConstructionError::MissingDependency {
				type_name: self.type_name,
				index,
			}
			.into()
		})
	}

	pub fn optional<U: Any + Send + Sync>(&self, index: usize) -> DiResult<Option<Arc<U>>> {
		match self.values.get(index) {
			None | Some(Resolved::Absent) => Ok(None),
			Some(resolved) => resolved
				.downcast::<U>()
				.map(Some)
				.ok_or_else(|| DiError::from(self.type_error::<U>(index))),
		}
	}

	/// Every element of an aggregated argument.
	pub fn all<U: Any + Send + Sync>(&self, index: usize) -> DiResult<Vec<Arc<U>>> {
		match self.values.get(index) {
			Some(Resolved::Sequence(items)) => items
				.iter()
				.map(|item| {
					item.downcast::<U>()
						.ok_or_else(|| DiError::from(self.type_error::<U>(index)))
				})
				.collect(),
			None | Some(Resolved::Absent) => Err(ConstructionError::MissingDependency {
				type_name: self.type_name,
				index,
			}
			.into()),
			Some(Resolved::Value(_)) => Err(self.type_error::<Vec<U>>(index).into()),
		}
	}

	fn type_error<U>(&self, index: usize) -> ConstructionError {
		ConstructionError::ArgumentType {
			type_name: self.type_name,
			index,
			expected: std::any::type_name::<U>(),
		}
	}
}

/// Builds a new instance of `implementation`.
///
/// `resolve_child` is invoked once per child request, in declared order,
/// at the moment that child is needed.
pub fn construct<F>(
	implementation: &ImplementationType,
	plan: &Plan,
	children: &[RequestId],
	mut resolve_child: F,
) -> DiResult<Instance>
where
	F: FnMut(RequestId) -> DiResult<Resolved>,
{
	let inner = &implementation.inner;

	let mut positional = Vec::new();
	let mut properties = Vec::new();
	for &child in children {
		let request = plan.request(child)?;
		match request.target() {
			Some(target) if target.kind() == TargetKind::ClassProperty => {
				let name = target
					.name()
					.map(str::to_string)
					.unwrap_or_else(|| request.service_identifier().to_string());
				let setter = implementation.property(&name).cloned().ok_or_else(|| {
					ConstructionError::UnknownProperty {
						type_name: inner.name,
						property: name.clone(),
					}
				})?;
				properties.push((child, setter));
			}
			_ => positional.push(child),
		}
	}

	if positional.len() != inner.arity {
		return Err(ConstructionError::ArityMismatch {
			type_name: inner.name,
			declared: inner.arity,
			supplied: positional.len(),
		}
		.into());
	}

	let values = positional
		.into_iter()
		.map(&mut resolve_child)
		.collect::<DiResult<Vec<_>>>()?;
	let arguments = Arguments {
		type_name: inner.name,
		values,
	};
	let mut value = (inner.constructor)(&arguments)?;

	for (child, setter) in properties {
		let resolved = resolve_child(child)?;
		setter(value.as_mut(), resolved)?;
	}

	if let Some(hook) = &inner.post_construct {
		hook(value.as_mut())?;
	}

	Ok(Arc::from(value))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::target::Target;
	use crate::value::instance;
	use rstest::rstest;

	#[derive(Default)]
	struct Logger;

	struct Service {
		name: Arc<String>,
		logger: Option<Arc<Logger>>,
		started: bool,
	}

	fn service_type() -> ImplementationType {
		ImplementationType::builder::<Service, _>(1, |args| {
			Ok(Service {
				name: args.required::<String>(0)?,
				logger: None,
				started: false,
			})
		})
		.property("logger", |this: &mut Service, value| {
			this.logger = value.downcast::<Logger>();
			Ok(())
		})
		.post_construct(|this: &mut Service| {
			this.started = true;
			Ok(())
		})
		.build()
	}

	#[rstest]
	fn test_arguments_then_properties_in_order() {
		// Arrange
		let mut plan = Plan::new("Service", Some(Target::variable("Service")), vec![]);
		let root = plan.root();
		let name = plan.add_child(root, "Name", Some(Target::argument("Name")), vec![]).unwrap();
		let logger = plan
			.add_child(root, "Logger", Some(Target::property("logger", "Logger")), vec![])
			.unwrap();
		let mut order = Vec::new();

		// Act
		let built = construct(&service_type(), &plan, &[name, logger], |child| {
			order.push(child);
			Ok(if child == name {
				Resolved::Value(instance("api".to_string()))
			} else {
				Resolved::Value(instance(Logger))
			})
		})
		.unwrap();

		// Assert
		let service = built.downcast::<Service>().ok().unwrap();
		assert_eq!(order, vec![name, logger]);
		assert_eq!(service.name.as_str(), "api");
		assert!(service.logger.is_some());
		assert!(service.started);
	}

	#[rstest]
	fn test_arity_mismatch_resolves_nothing() {
		// Arrange
		let plan = Plan::new("Service", Some(Target::variable("Service")), vec![]);
		let mut calls = 0;

		// Act
		let result = construct(&service_type(), &plan, &[], |_| {
			calls += 1;
			Ok(Resolved::Absent)
		});

		// Assert
		assert!(matches!(
			result,
			Err(DiError::Construction(ConstructionError::ArityMismatch {
				declared: 1,
				supplied: 0,
				..
			}))
		));
		assert_eq!(calls, 0);
	}

	#[rstest]
	fn test_absent_required_argument_fails() {
		// Arrange
		let mut plan = Plan::new("Service", Some(Target::variable("Service")), vec![]);
		let name = plan
			.add_child(plan.root(), "Name", Some(Target::argument("Name").optional()), vec![])
			.unwrap();

		// Act
		let result = construct(&service_type(), &plan, &[name], |_| Ok(Resolved::Absent));

		// Assert
		assert!(matches!(
			result,
			Err(DiError::Construction(ConstructionError::MissingDependency { index: 0, .. }))
		));
	}

	#[rstest]
	fn test_unknown_property_is_rejected() {
		// Arrange
		let mut plan = Plan::new("Logger", Some(Target::variable("Logger")), vec![]);
		let child = plan
			.add_child(plan.root(), "Clock", Some(Target::property("clock", "Clock")), vec![])
			.unwrap();

		// Act
		let result = construct(&ImplementationType::of_default::<Logger>(), &plan, &[child], |_| {
			Ok(Resolved::Absent)
		});

		// Assert
		match result {
			Err(DiError::Construction(ConstructionError::UnknownProperty { property, .. })) => {
				assert_eq!(property, "clock");
			}
			other => panic!("Expected UnknownProperty, got {:?}", other.map(|_| ())),
		}
	}

	#[rstest]
	fn test_optional_and_all_accessors() {
		// Arrange
		let arguments = Arguments {
			type_name: "Test",
			values: vec![
				Resolved::Absent,
				Resolved::Sequence(vec![
					Resolved::Value(instance(1u32)),
					Resolved::Value(instance(2u32)),
				]),
				Resolved::Value(instance(3u32)),
			],
		};

		// Assert
		assert!(arguments.optional::<u32>(0).unwrap().is_none());
		let all: Vec<u32> = arguments.all::<u32>(1).unwrap().iter().map(|v| **v).collect();
		assert_eq!(all, vec![1, 2]);
		assert!(matches!(
			arguments.required::<String>(2),
			Err(DiError::Construction(ConstructionError::ArgumentType { index: 2, .. }))
		));
		assert!(arguments.all::<u32>(2).is_err());
	}
}
