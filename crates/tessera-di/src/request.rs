//! Request trees
//!
//! A [`Plan`] is an arena of [`Request`] nodes produced by the planner
//! immediately before resolution. Children are stored in declared order and
//! parents are referenced by index, so the tree owns no cycles.
//!
//! ```
//! use tessera_di::{Binding, Plan, Target, instance};
//!
//! let port = Binding::builder("Port").to_constant_value(instance(8080u16));
//!
//! let mut plan = Plan::new("Ports", Some(Target::variable("Ports").array()), vec![]);
//! let child = plan
//!     .add_child(plan.root(), "Ports", Some(Target::variable("Ports").array()), vec![port])
//!     .unwrap();
//!
//! assert_eq!(plan.children(plan.root()).unwrap(), &[child]);
//! assert_eq!(plan.request(child).unwrap().parent(), Some(plan.root()));
//! ```

use crate::binding::Binding;
use crate::error::{DiError, DiResult};
use crate::identifier::ServiceIdentifier;
use crate::target::Target;
use std::fmt;
use std::sync::Arc;

/// Index of a request node inside its [`Plan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(usize);

impl RequestId {
	pub fn index(&self) -> usize {
		self.0
	}
}

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One "resolve this identifier here" step.
#[derive(Debug, Clone)]
pub struct Request {
	id: RequestId,
	service_identifier: ServiceIdentifier,
	target: Option<Target>,
	bindings: Vec<Arc<Binding>>,
	parent: Option<RequestId>,
	children: Vec<RequestId>,
}

impl Request {
	pub fn id(&self) -> RequestId {
		self.id
	}

	pub fn service_identifier(&self) -> &ServiceIdentifier {
		&self.service_identifier
	}

	pub fn target(&self) -> Option<&Target> {
		self.target.as_ref()
	}

	/// Matching bindings, already ordered by the planner.
	pub fn bindings(&self) -> &[Arc<Binding>] {
		&self.bindings
	}

	pub fn parent(&self) -> Option<RequestId> {
		self.parent
	}

	pub fn children(&self) -> &[RequestId] {
		&self.children
	}
}

#[derive(Debug, Clone)]
pub struct Plan {
	requests: Vec<Request>,
	/// Whether Request-scoped bindings are cached during a resolution
	request_scoped: bool,
}

impl Plan {
	/// Creates a plan with its root request. Request-scoped caching is on.
	pub fn new(
		identifier: impl Into<ServiceIdentifier>,
		target: Option<Target>,
		bindings: Vec<Arc<Binding>>,
	) -> Self {
		let root = Request {
			id: RequestId(0),
			service_identifier: identifier.into(),
			target,
			bindings,
			parent: None,
			children: Vec::new(),
		};
		Self {
			requests: vec![root],
			request_scoped: true,
		}
	}

	/// Disables the request scope; Request-scoped bindings are then rebuilt
	/// on every use.
	pub fn without_request_scope(mut self) -> Self {
		self.request_scoped = false;
		self
	}

	/// Appends a child to `parent` after its existing children.
	pub fn add_child(
		&mut self,
		parent: RequestId,
		identifier: impl Into<ServiceIdentifier>,
		target: Option<Target>,
		bindings: Vec<Arc<Binding>>,
	) -> DiResult<RequestId> {
		if parent.0 >= self.requests.len() {
			return Err(DiError::UnknownRequest(parent));
		}
		let id = RequestId(self.requests.len());
		self.requests.push(Request {
			id,
			service_identifier: identifier.into(),
			target,
			bindings,
			parent: Some(parent),
			children: Vec::new(),
		});
		self.requests[parent.0].children.push(id);
		Ok(id)
	}

	pub fn root(&self) -> RequestId {
		RequestId(0)
	}

	pub fn root_request(&self) -> &Request {
		&self.requests[0]
	}

	pub fn request(&self, id: RequestId) -> DiResult<&Request> {
		self.requests.get(id.0).ok_or(DiError::UnknownRequest(id))
	}

	pub fn children(&self, id: RequestId) -> DiResult<&[RequestId]> {
		self.request(id).map(Request::children)
	}

	pub fn is_request_scoped(&self) -> bool {
		self.request_scoped
	}

	pub fn len(&self) -> usize {
		self.requests.len()
	}

	pub fn is_empty(&self) -> bool {
		self.requests.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Request> {
		self.requests.iter()
	}

	/// True when `id` aggregates its children into a sequence: its target is
	/// an array and it is not the echo of a parent array request for the same
	/// identifier.
	pub fn is_array_boundary(&self, id: RequestId) -> DiResult<bool> {
		let request = self.request(id)?;
		let Some(target) = request.target() else {
			return Ok(false);
		};
		if !target.is_array() {
			return Ok(false);
		}
		let parent_target = match request.parent() {
			Some(parent) => self.request(parent)?.target(),
			None => None,
		};
		Ok(parent_target
			.is_none_or(|parent| !parent.matches_array(target.service_identifier())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_children_keep_declared_order() {
		// Arrange
		let mut plan = Plan::new("Root", Some(Target::variable("Root")), vec![]);
		let root = plan.root();

		// Act
		let a = plan.add_child(root, "A", Some(Target::argument("A")), vec![]).unwrap();
		let b = plan.add_child(root, "B", Some(Target::argument("B")), vec![]).unwrap();
		let c = plan.add_child(root, "C", Some(Target::argument("C")), vec![]).unwrap();

		// Assert
		assert_eq!(plan.children(root).unwrap(), &[a, b, c]);
		assert_eq!(plan.len(), 4);
	}

	#[rstest]
	fn test_add_child_to_unknown_parent_fails() {
		// Arrange
		let mut plan = Plan::new("Root", None, vec![]);

		// Act
		let result = plan.add_child(RequestId(9), "A", None, vec![]);

		// Assert
		assert!(matches!(result, Err(DiError::UnknownRequest(RequestId(9)))));
	}

	#[rstest]
	fn test_array_echo_is_not_a_boundary() {
		// Arrange
		let mut plan = Plan::new("Weapon", Some(Target::variable("Weapon").array()), vec![]);
		let root = plan.root();
		let echo = plan
			.add_child(root, "Weapon", Some(Target::variable("Weapon").array()), vec![])
			.unwrap();

		// Assert
		assert!(plan.is_array_boundary(root).unwrap());
		assert!(!plan.is_array_boundary(echo).unwrap());
	}

	#[rstest]
	fn test_nested_array_of_other_identifier_is_a_boundary() {
		// Arrange
		let mut plan = Plan::new("Ninja", Some(Target::variable("Ninja")), vec![]);
		let weapons = plan
			.add_child(plan.root(), "Weapon", Some(Target::argument("Weapon").array()), vec![])
			.unwrap();

		// Assert
		assert!(!plan.is_array_boundary(plan.root()).unwrap());
		assert!(plan.is_array_boundary(weapons).unwrap());
	}

	#[rstest]
	fn test_request_scope_flag() {
		// Act
		let scoped = Plan::new("A", None, vec![]);
		let unscoped = Plan::new("A", None, vec![]).without_request_scope();

		// Assert
		assert!(scoped.is_request_scoped());
		assert!(!unscoped.is_request_scoped());
	}
}
