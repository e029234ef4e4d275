//! Target metadata: how a request was asked for

use crate::identifier::ServiceIdentifier;

/// Injection point kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
	/// Top-level lookup
	Variable,
	ConstructorArgument,
	ClassProperty,
}

#[derive(Debug, Clone)]
pub struct Target {
	kind: TargetKind,
	service_identifier: ServiceIdentifier,
	name: Option<String>,
	array: bool,
	optional: bool,
}

impl Target {
	pub fn new(kind: TargetKind, identifier: impl Into<ServiceIdentifier>) -> Self {
		Self {
			kind,
			service_identifier: identifier.into(),
			name: None,
			array: false,
			optional: false,
		}
	}

	pub fn variable(identifier: impl Into<ServiceIdentifier>) -> Self {
		Self::new(TargetKind::Variable, identifier)
	}

	pub fn argument(identifier: impl Into<ServiceIdentifier>) -> Self {
		Self::new(TargetKind::ConstructorArgument, identifier)
	}

	/// A property injection point named `name`.
	pub fn property(name: impl Into<String>, identifier: impl Into<ServiceIdentifier>) -> Self {
		let mut target = Self::new(TargetKind::ClassProperty, identifier);
		target.name = Some(name.into());
		target
	}

	/// Marks the target as asking for every matching binding.
	pub fn array(mut self) -> Self {
		self.array = true;
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	pub fn kind(&self) -> TargetKind {
		self.kind
	}

	pub fn service_identifier(&self) -> &ServiceIdentifier {
		&self.service_identifier
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn is_array(&self) -> bool {
		self.array
	}

	pub fn is_optional(&self) -> bool {
		self.optional
	}

	/// True when this is an array target for exactly `identifier`.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::{ServiceIdentifier, Target};
	///
	/// let target = Target::argument("Weapon").array();
	/// assert!(target.matches_array(&ServiceIdentifier::from("Weapon")));
	/// assert!(!target.matches_array(&ServiceIdentifier::from("Shield")));
	/// assert!(!Target::argument("Weapon").matches_array(&ServiceIdentifier::from("Weapon")));
	/// ```
	pub fn matches_array(&self, identifier: &ServiceIdentifier) -> bool {
		self.array && self.service_identifier == *identifier
	}
}
