//! Service identifiers

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Process-unique token with a human readable description.
///
/// Two symbols created with the same description are still distinct.
///
/// # Examples
///
/// ```
/// use tessera_di::Symbol;
///
/// let a = Symbol::new("Logger");
/// let b = Symbol::new("Logger");
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "Symbol(Logger)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
	id: u64,
	description: Cow<'static, str>,
}

impl Symbol {
	pub fn new(description: impl Into<Cow<'static, str>>) -> Self {
		Self {
			id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
			description: description.into(),
		}
	}

	pub fn description(&self) -> &str {
		&self.description
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Symbol({})", self.description)
	}
}

/// Opaque key naming what a request wants.
#[derive(Debug, Clone)]
pub enum ServiceIdentifier {
	/// Plain string key
	Name(Cow<'static, str>),
	/// Unique symbol key
	Symbol(Symbol),
	/// Type token
	Type { id: TypeId, name: &'static str },
}

impl ServiceIdentifier {
	/// Creates a string identifier.
	pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
		Self::Name(name.into())
	}

	/// Creates a type-token identifier for `T`.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::ServiceIdentifier;
	///
	/// struct Logger;
	///
	/// assert_eq!(ServiceIdentifier::of::<Logger>(), ServiceIdentifier::of::<Logger>());
	/// assert!(ServiceIdentifier::of::<Logger>().to_string().ends_with("Logger"));
	/// ```
	pub fn of<T: 'static>() -> Self {
		Self::Type {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}
}

// Type tokens compare by TypeId only; the name is for display.
impl PartialEq for ServiceIdentifier {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Name(a), Self::Name(b)) => a == b,
			(Self::Symbol(a), Self::Symbol(b)) => a == b,
			(Self::Type { id: a, .. }, Self::Type { id: b, .. }) => a == b,
			_ => false,
		}
	}
}

impl Eq for ServiceIdentifier {}

impl std::hash::Hash for ServiceIdentifier {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Self::Name(name) => name.hash(state),
			Self::Symbol(symbol) => symbol.hash(state),
			Self::Type { id, .. } => id.hash(state),
		}
	}
}

impl fmt::Display for ServiceIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name(name) => f.write_str(name),
			Self::Symbol(symbol) => symbol.fmt(f),
			Self::Type { name, .. } => f.write_str(name),
		}
	}
}

impl From<&'static str> for ServiceIdentifier {
	fn from(name: &'static str) -> Self {
		Self::Name(Cow::Borrowed(name))
	}
}

impl From<String> for ServiceIdentifier {
	fn from(name: String) -> Self {
		Self::Name(Cow::Owned(name))
	}
}

impl From<Symbol> for ServiceIdentifier {
	fn from(symbol: Symbol) -> Self {
		Self::Symbol(symbol)
	}
}
