//! Resolution-local circular dependency detection
//!
//! A [`Plan`](crate::Plan) arena cannot link a node back to an ancestor, but
//! a planner that unrolls a cyclic registry produces paths that re-enter the
//! same binding, and very deep plans can exhaust the stack.
//! [`CycleDetector`] lives for exactly one root resolution and tracks:
//!
//! - **Depth**: every request node entered, bounded by
//!   [`ResolverConfig::max_resolution_depth`]
//! - **Construction path**: the `Instance` bindings currently being built,
//!   so re-entering one is reported with the full `A -> B -> A` path
//!
//! Both are released by RAII guards, including on error paths.

use crate::binding::BindingId;
use crate::config::ResolverConfig;
use crate::error::DiError;
use crate::identifier::ServiceIdentifier;
use std::cell::RefCell;
use std::collections::HashSet;

struct CycleDetectionState {
	/// Bindings currently under construction (O(1) circular detection)
	resolution_set: HashSet<BindingId>,
	resolution_depth: usize,
	/// Construction path (for displaying circular paths)
	resolution_path: Vec<(BindingId, String)>,
}

pub struct CycleDetector {
	state: RefCell<CycleDetectionState>,
	detect_cycles: bool,
	max_depth: usize,
}

impl CycleDetector {
	pub fn new(config: &ResolverConfig) -> Self {
		Self {
			state: RefCell::new(CycleDetectionState {
				resolution_set: HashSet::new(),
				resolution_depth: 0,
				resolution_path: Vec::new(),
			}),
			detect_cycles: config.detect_cycles,
			max_depth: config.max_resolution_depth,
		}
	}

	pub fn depth(&self) -> usize {
		self.state.borrow().resolution_depth
	}

	/// Records entry into one request node.
	pub fn enter(&self) -> Result<ResolutionGuard<'_>, CycleError> {
		let mut state = self.state.borrow_mut();
		let depth = state.resolution_depth + 1;
		if depth > self.max_depth {
			return Err(CycleError::MaxDepthExceeded(depth));
		}
		state.resolution_depth = depth;
		Ok(ResolutionGuard::Depth(self))
	}

	/// Records the start of constructing `binding`.
	///
	/// Fails when the binding is already on the construction path. Always
	/// succeeds when cycle detection is disabled.
	pub fn begin_construction(
		&self,
		binding: BindingId,
		identifier: &ServiceIdentifier,
	) -> Result<ResolutionGuard<'_>, CycleError> {
		if !self.detect_cycles {
			return Ok(ResolutionGuard::Untracked);
		}
		let mut state = self.state.borrow_mut();
		if state.resolution_set.contains(&binding) {
			return Err(CycleError::CircularDependency {
				identifier: identifier.to_string(),
				path: build_cycle_path(&state, binding, identifier),
			});
		}
		state.resolution_set.insert(binding);
		state.resolution_path.push((binding, identifier.to_string()));
		Ok(ResolutionGuard::Tracked(self, binding))
	}
}

fn build_cycle_path(
	state: &CycleDetectionState,
	binding: BindingId,
	identifier: &ServiceIdentifier,
) -> String {
	match state.resolution_path.iter().position(|(id, _)| *id == binding) {
		Some(start) => {
			let cycle: Vec<&str> = state.resolution_path[start..]
				.iter()
				.map(|(_, name)| name.as_str())
				.collect();
			format!("{} -> {}", cycle.join(" -> "), identifier)
		}
		None => format!("Unknown cycle involving {}", identifier),
	}
}

/// RAII guard: releases its depth level or path entry on drop
#[must_use]
pub enum ResolutionGuard<'a> {
	Depth(&'a CycleDetector),
	Tracked(&'a CycleDetector, BindingId),
	Untracked,
}

impl Drop for ResolutionGuard<'_> {
	fn drop(&mut self) {
		match self {
			ResolutionGuard::Depth(detector) => {
				let mut state = detector.state.borrow_mut();
				state.resolution_depth = state.resolution_depth.saturating_sub(1);
			}
			ResolutionGuard::Tracked(detector, binding) => {
				let binding = *binding;
				let mut state = detector.state.borrow_mut();
				state.resolution_set.remove(&binding);
				if let Some(pos) = state
					.resolution_path
					.iter()
					.rposition(|(id, _)| *id == binding)
				{
					state.resolution_path.remove(pos);
				}
			}
			ResolutionGuard::Untracked => {}
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
	#[error("Circular dependency detected: {identifier} (path: {path})")]
	CircularDependency { identifier: String, path: String },

	#[error("Maximum resolution depth exceeded: {0}")]
	MaxDepthExceeded(usize),
}

impl From<CycleError> for DiError {
	fn from(error: CycleError) -> Self {
		match error {
			CycleError::CircularDependency { identifier, path } => {
				DiError::CircularDependency { identifier, path }
			}
			CycleError::MaxDepthExceeded(depth) => DiError::MaxDepthExceeded(depth),
		}
	}
}
