use crate::tree::Node;
use fnv::FnvHashSet;

/// A `ScoringPolicy` excludes fields and nodes from scoring.
pub trait ScoringPolicy {
	/// Ignored fields contribute no ratio.
	fn is_ignored_field(&self, name: &str) -> bool;
	/// Unused nodes are neither scored nor descended into.
	fn is_unused_node(&self, node: &Node) -> bool;
}

/// The default [`ScoringPolicy`](trait.ScoringPolicy.html), which ignores fields and nodes by name.
#[derive(Clone, Debug, Default)]
pub struct NamePolicy {
	ignored_fields: FnvHashSet<String>,
	unused_nodes: FnvHashSet<String>,
}

impl NamePolicy {
	pub fn new<F, N>(ignored_fields: F, unused_nodes: N) -> Self
	where
		F: IntoIterator,
		F::Item: Into<String>,
		N: IntoIterator,
		N::Item: Into<String>,
	{
		Self {
			ignored_fields: ignored_fields.into_iter().map(Into::into).collect(),
			unused_nodes: unused_nodes.into_iter().map(Into::into).collect(),
		}
	}
}

impl ScoringPolicy for NamePolicy {
	fn is_ignored_field(&self, name: &str) -> bool {
		self.ignored_fields.contains(name)
	}

	fn is_unused_node(&self, node: &Node) -> bool {
		self.unused_nodes.contains(&node.name)
	}
}

#[test]
fn test_name_policy() {
	let policy = NamePolicy::new(vec!["id"], vec!["comment"]);
	assert!(policy.is_ignored_field("id"));
	assert!(!policy.is_ignored_field("color"));
	assert!(policy.is_unused_node(&Node::new("comment")));
	assert!(!policy.is_unused_node(&Node::new("item")));
	let policy = NamePolicy::default();
	assert!(!policy.is_ignored_field("id"));
}
