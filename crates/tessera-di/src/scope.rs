//! Binding scopes and the per-resolution request cache

use crate::binding::BindingId;
use crate::value::Instance;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Lifetime policy of a binding's produced value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingScope {
	/// Never cached
	#[default]
	Transient,
	/// Cached on the binding after the first construction
	Singleton,
	/// Cached for the duration of one root resolution
	Request,
}

impl BindingScope {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Transient => "transient",
			Self::Singleton => "singleton",
			Self::Request => "request",
		}
	}
}

/// Cache of Request-scoped values, keyed by binding id.
///
/// Clones share the same storage, so every node of one plan sees the same
/// entries. A freshly created scope is always empty.
#[derive(Clone, Default)]
pub struct RequestScope {
	cache: Arc<RwLock<HashMap<BindingId, Instance>>>,
}

impl RequestScope {
	/// Creates a new RequestScope with an empty cache.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::RequestScope;
	///
	/// let scope = RequestScope::new();
	/// assert!(scope.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Retrieves the value cached for a binding.
	pub fn get(&self, binding: &BindingId) -> Option<Instance> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.get(binding).cloned()
	}

	pub fn contains(&self, binding: &BindingId) -> bool {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.contains_key(binding)
	}

	/// Stores a value unless the binding already has one.
	///
	/// Returns `true` when the value was stored.
	pub fn insert_if_absent(&self, binding: BindingId, value: Instance) -> bool {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		if cache.contains_key(&binding) {
			return false;
		}
		cache.insert(binding, value);
		true
	}

	pub fn len(&self) -> usize {
		self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl std::fmt::Debug for RequestScope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestScope")
			.field("entries", &self.len())
			.finish()
	}
}
