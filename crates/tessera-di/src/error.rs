//! Resolution errors
//!
//! Every failure surfaced by the engine describes a static misconfiguration
//! of the binding registry or the plan, so none of them are retried.

use crate::request::RequestId;

/// Result type used throughout the resolution engine
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised while resolving a plan
#[derive(Debug, thiserror::Error)]
pub enum DiError {
	/// A binding was declared but never given a construction strategy
	#[error("Invalid binding type: {0}")]
	InvalidBindingType(String),

	/// A non-optional request has no binding to resolve with
	#[error("No matching bindings found for serviceIdentifier: {0}")]
	NoMatchingBindings(String),

	/// The instance constructor could not build its target
	#[error(transparent)]
	Construction(#[from] ConstructionError),

	/// A binding is already being constructed further up the resolution path
	#[error(
		"Circular dependency detected: {identifier}\n  Path: {path}\nThis forms a cycle that cannot be resolved."
	)]
	CircularDependency {
		/// Identifier of the binding that closed the cycle
		identifier: String,
		/// Circular path (format: A -> B -> C -> A)
		path: String,
	},

	/// Maximum resolution depth exceeded
	#[error(
		"Maximum resolution depth exceeded: {0}\nThis likely indicates an extremely deep or circular request tree."
	)]
	MaxDepthExceeded(usize),

	/// The resolved value does not have the shape or type the caller asked for
	#[error("Type mismatch for {identifier}: expected {expected}")]
	TypeMismatch {
		identifier: String,
		expected: &'static str,
	},

	/// The plan references a request node that does not exist
	#[error("Unknown request node: {0}")]
	UnknownRequest(RequestId),

	/// Resolver configuration could not be parsed
	#[error("Invalid resolver configuration: {0}")]
	Config(#[from] toml::de::Error),

	/// Error raised by a host callback (factory, provider, activation hook...)
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

/// Failures of the instance constructor
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
	#[error(
		"The number of constructor arguments in {type_name} ({declared}) does not match the number of injections ({supplied})"
	)]
	ArityMismatch {
		type_name: &'static str,
		declared: usize,
		supplied: usize,
	},

	#[error("{type_name}: required constructor argument #{index} resolved to nothing")]
	MissingDependency {
		type_name: &'static str,
		index: usize,
	},

	#[error("{type_name}: constructor argument #{index} is not a {expected}")]
	ArgumentType {
		type_name: &'static str,
		index: usize,
		expected: &'static str,
	},

	#[error("{type_name} has no injectable property named `{property}`")]
	UnknownProperty {
		type_name: &'static str,
		property: String,
	},

	#[error("{type_name}: property `{property}` rejected its value: {reason}")]
	PropertyType {
		type_name: &'static str,
		property: String,
		reason: String,
	},
}
