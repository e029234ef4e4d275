//! Resolved values

use std::any::Any;
use std::sync::Arc;

/// A produced value. Identity is pointer identity.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Wraps a concrete value into an [`Instance`].
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
	Arc::new(value)
}

/// Result of resolving one request node.
///
/// The shape is decided by the request's target metadata: array targets
/// aggregate into a [`Resolved::Sequence`], optional unbound targets yield
/// [`Resolved::Absent`], everything else a single [`Resolved::Value`].
#[derive(Clone)]
pub enum Resolved {
	/// The absent marker
	Absent,
	Value(Instance),
	Sequence(Vec<Resolved>),
}

impl Resolved {
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}

	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Self::Value(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Resolved]> {
		match self {
			Self::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Downcasts a single value to `T`.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::{Resolved, instance};
	///
	/// let resolved = Resolved::Value(instance(42u32));
	/// assert_eq!(*resolved.downcast::<u32>().unwrap(), 42);
	/// assert!(resolved.downcast::<String>().is_none());
	/// assert!(Resolved::Absent.downcast::<u32>().is_none());
	/// ```
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.as_instance()
			.and_then(|value| value.clone().downcast::<T>().ok())
	}

	/// Returns true when both sides are single values sharing one allocation.
	pub fn same_instance(&self, other: &Resolved) -> bool {
		match (self, other) {
			(Self::Value(a), Self::Value(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl std::fmt::Debug for Resolved {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Absent => f.write_str("Absent"),
			Self::Value(value) => write!(f, "Value({:p})", Arc::as_ptr(value)),
			Self::Sequence(items) => f.debug_list().entries(items).finish(),
		}
	}
}

impl From<Instance> for Resolved {
	fn from(value: Instance) -> Self {
		Self::Value(value)
	}
}
