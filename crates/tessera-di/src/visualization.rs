//! Plan visualization for development and debugging
//!
//! Renders a [`Plan`] in DOT format, which can be rendered using Graphviz.
//! Every request becomes its own node, so an identifier requested twice
//! shows up twice.
//!
//! ## Example
//!
//! ```rust
//! use tessera_di::visualization::DependencyGraph;
//! use tessera_di::{Binding, Plan, Target, instance};
//!
//! let db = Binding::builder("Database").in_singleton_scope().to_constant_value(instance(()));
//! let mut plan = Plan::new("UserService", Some(Target::variable("UserService")), vec![]);
//! plan.add_child(plan.root(), "Database", Some(Target::argument("Database")), vec![db]).unwrap();
//!
//! let dot = DependencyGraph::from_plan(&plan).to_dot();
//! assert!(dot.contains("r0 -> r1;"));
//! assert!(dot.contains("label=\"Database\\n[singleton]"));
//! ```

use crate::request::{Plan, RequestId};

/// Represents a node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
	pub request: RequestId,
	/// Rendered service identifier
	pub name: String,
	/// Scope of the first binding: "singleton", "request", "transient", or
	/// "unbound"
	pub scope: String,
	/// Strategy of the first binding
	pub binding_type: Option<&'static str>,
	pub array: bool,
	pub optional: bool,
}

/// Dependency graph for visualization
#[derive(Debug, Default)]
pub struct DependencyGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<(RequestId, RequestId)>,
}

impl DependencyGraph {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a graph with one node per request in `plan`, in depth-first
	/// declared order, and one edge per parent/child pair.
	pub fn from_plan(plan: &Plan) -> Self {
		let mut graph = Self::new();
		let mut stack: Vec<RequestId> = vec![plan.root()];
		while let Some(id) = stack.pop() {
			let Ok(request) = plan.request(id) else {
				continue;
			};
			let binding = request.bindings().first();
			graph.nodes.push(GraphNode {
				request: id,
				name: request.service_identifier().to_string(),
				scope: binding
					.map(|b| b.scope().as_str())
					.unwrap_or("unbound")
					.to_string(),
				binding_type: binding.map(|b| b.kind().name()),
				array: request.target().is_some_and(|t| t.is_array()),
				optional: request.target().is_some_and(|t| t.is_optional()),
			});
			graph
				.edges
				.extend(request.children().iter().map(|&child| (id, child)));
			// Reverse so children are visited in declared order
			stack.extend(request.children().iter().rev().copied());
		}
		graph
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// First node, in depth-first order, whose identifier renders as `name`.
	pub fn node(&self, name: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.name == name)
	}

	pub fn edges(&self) -> &[(RequestId, RequestId)] {
		&self.edges
	}

	/// Generate DOT format representation
	pub fn to_dot(&self) -> String {
		let mut dot = String::from("digraph Plan {\n");
		dot.push_str("  rankdir=LR;\n");
		dot.push_str("  node [shape=box];\n\n");

		for node in &self.nodes {
			let color = match node.scope.as_str() {
				"singleton" => "lightblue",
				"request" => "lightgreen",
				"transient" => "lightyellow",
				_ => "lightgray",
			};
			let mut label = format!("{}\\n[{}]", escape(&node.name), node.scope);
			if let Some(binding_type) = node.binding_type {
				label.push_str(&format!("\\n{}", binding_type));
			}
			if node.array {
				label.push_str("\\n(array)");
			}
			let style = if node.optional {
				"filled,dashed"
			} else {
				"filled"
			};
			dot.push_str(&format!(
				"  r{} [label=\"{}\", style=\"{}\", fillcolor={}];\n",
				node.request.index(),
				label,
				style,
				color
			));
		}

		dot.push('\n');

		for (from, to) in &self.edges {
			dot.push_str(&format!("  r{} -> r{};\n", from.index(), to.index()));
		}

		dot.push_str("}\n");
		dot
	}
}

/// Escapes a string for use inside a quoted DOT ID.
fn escape(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());
	for c in raw.chars() {
		match c {
			'"' | '\\' => {
				escaped.push('\\');
				escaped.push(c);
			}
			'\n' => escaped.push_str("\\n"),
			_ => escaped.push(c),
		}
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::binding::Binding;
	use crate::identifier::Symbol;
	use crate::target::Target;
	use crate::value::instance;
	use rstest::rstest;

	#[rstest]
	fn test_from_plan_collects_nodes_and_edges() {
		// Arrange
		let logger = Binding::builder("Logger").in_request_scope().to_constant_value(instance(()));
		let mut plan = Plan::new("Service", Some(Target::variable("Service")), vec![]);
		let root = plan.root();
		let first = plan
			.add_child(root, "Logger", Some(Target::argument("Logger")), vec![logger.clone()])
			.unwrap();
		let second = plan
			.add_child(root, "Logger", Some(Target::argument("Logger")), vec![logger])
			.unwrap();
		let cache = plan
			.add_child(root, "Cache", Some(Target::argument("Cache").optional()), vec![])
			.unwrap();

		// Act
		let graph = DependencyGraph::from_plan(&plan);

		// Assert
		assert_eq!(graph.nodes().len(), 4);
		assert_eq!(graph.edges(), &[(root, first), (root, second), (root, cache)]);
		assert_eq!(graph.node("Logger").unwrap().request, first);
		assert_eq!(graph.node("Logger").unwrap().scope, "request");
		assert!(graph.node("Cache").unwrap().optional);
		assert_eq!(graph.node("Service").unwrap().scope, "unbound");
	}

	#[rstest]
	fn test_to_dot_output() {
		// Arrange
		let mut plan = Plan::new("A", Some(Target::variable("A")), vec![]);
		plan.add_child(plan.root(), "B", Some(Target::argument("B")), vec![])
			.unwrap();

		// Act
		let dot = DependencyGraph::from_plan(&plan).to_dot();

		// Assert
		assert!(dot.starts_with("digraph Plan {"));
		assert!(dot.contains("r0 -> r1;"));
		assert!(dot.contains("r1 [label=\"B\\n[unbound]\""));
		assert!(dot.trim_end().ends_with('}'));
	}

	#[rstest]
	fn test_to_dot_escapes_quotes_and_backslashes() {
		// Arrange
		let identifier = Symbol::new(r#"say "hi" \ bye"#);
		let plan = Plan::new(identifier.clone(), Some(Target::variable(identifier)), vec![]);

		// Act
		let dot = DependencyGraph::from_plan(&plan).to_dot();

		// Assert
		assert!(dot.contains(r#"label="Symbol(say \"hi\" \\ bye)\n[unbound]""#));
	}
}
