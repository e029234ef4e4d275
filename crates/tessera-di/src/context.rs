//! Resolution context

use crate::request::Plan;
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Bundles a plan with host data for one resolution.
///
/// Dynamic-value, factory, provider and activation callbacks receive the
/// context by reference, giving them read access to the plan and host data
/// without exposing the engine.
pub struct Context {
	id: Uuid,
	plan: Plan,
	data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
	/// Creates a context around a plan.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::{Context, Plan};
	///
	/// let ctx = Context::new(Plan::new("Root", None, vec![]));
	/// assert_eq!(ctx.plan().len(), 1);
	/// assert!(ctx.data::<String>().is_none());
	/// ```
	pub fn new(plan: Plan) -> Self {
		Self {
			id: Uuid::new_v4(),
			plan,
			data: None,
		}
	}

	/// Attaches host data readable from callbacks.
	///
	/// # Examples
	///
	/// ```
	/// use tessera_di::{Context, Plan};
	///
	/// let ctx = Context::new(Plan::new("Root", None, vec![])).with_data("container-7".to_string());
	/// assert_eq!(ctx.data::<String>().unwrap().as_str(), "container-7");
	/// ```
	pub fn with_data<T: Any + Send + Sync>(mut self, data: T) -> Self {
		self.data = Some(Arc::new(data));
		self
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn plan(&self) -> &Plan {
		&self.plan
	}

	pub fn data<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.data
			.as_ref()
			.and_then(|data| data.clone().downcast::<T>().ok())
	}

	/// Consumes the context, returning its plan.
	pub fn into_plan(self) -> Plan {
		self.plan
	}
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("id", &self.id)
			.field("root", self.plan.root_request().service_identifier())
			.field("requests", &self.plan.len())
			.finish()
	}
}
