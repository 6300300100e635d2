use crate::tree::Node;

/// The nodes matching one observed node in model A and in model B. Either side is `None` when the reference tree has no structural match.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Correspondence<'r> {
	pub a: Option<&'r Node>,
	pub b: Option<&'r Node>,
}

impl<'r> Correspondence<'r> {
	pub fn both(a: &'r Node, b: &'r Node) -> Self {
		Self {
			a: Some(a),
			b: Some(b),
		}
	}

	pub fn absent() -> Self {
		Self { a: None, b: None }
	}

	/// Return both reference nodes, if both are present.
	pub fn pair(&self) -> Option<(&'r Node, &'r Node)> {
		match (self.a, self.b) {
			(Some(a), Some(b)) => Some((a, b)),
			_ => None,
		}
	}

	/// Resolve the correspondence of `child`, one of the children of the observed node this correspondence belongs to.
	pub fn child(
		&self,
		child: &Node,
		finder: &dyn CorrespondenceFinder,
		unused: bool,
	) -> Correspondence<'r> {
		Correspondence {
			a: self
				.a
				.and_then(|a| finder.find_corresponding(child, a, unused)),
			b: self
				.b
				.and_then(|b| finder.find_corresponding(child, b, unused)),
		}
	}
}

/// A `CorrespondenceFinder` finds the child of a reference node that structurally matches an observed child.
pub trait CorrespondenceFinder {
	/// `unused` is set when an earlier sibling of `child` was unused, which allows a looser match.
	fn find_corresponding<'r>(
		&self,
		child: &Node,
		reference_parent: &'r Node,
		unused: bool,
	) -> Option<&'r Node>;
}

/**
The default [`CorrespondenceFinder`](trait.CorrespondenceFinder.html). A reference child matches strictly when it has the same name and the same number of children as the observed child. When `unused` is set and there is no strict match, the first reference child with the same name matches.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct NameCorrespondence;

impl CorrespondenceFinder for NameCorrespondence {
	fn find_corresponding<'r>(
		&self,
		child: &Node,
		reference_parent: &'r Node,
		unused: bool,
	) -> Option<&'r Node> {
		let mut candidates = reference_parent
			.children
			.iter()
			.filter(|candidate| candidate.name == child.name);
		let strict = candidates
			.clone()
			.find(|candidate| candidate.children.len() == child.children.len());
		if strict.is_some() || !unused {
			strict
		} else {
			candidates.next()
		}
	}
}

#[test]
fn test_name_correspondence() {
	let reference = Node::new("root")
		.with_child(Node::new("item").with_field("tag", "a"))
		.with_child(
			Node::new("item")
				.with_field("tag", "b")
				.with_child(Node::new("part")),
		);
	let flat = Node::new("item");
	let nested = Node::new("item").with_child(Node::new("part"));
	let deep = Node::new("item")
		.with_child(Node::new("part"))
		.with_child(Node::new("part"));
	let finder = NameCorrespondence;
	let found = finder.find_corresponding(&flat, &reference, false).unwrap();
	assert_eq!(found.field("tag").unwrap().value, "a");
	let found = finder.find_corresponding(&nested, &reference, false).unwrap();
	assert_eq!(found.field("tag").unwrap().value, "b");
	assert!(finder.find_corresponding(&deep, &reference, false).is_none());
	let found = finder.find_corresponding(&deep, &reference, true).unwrap();
	assert_eq!(found.field("tag").unwrap().value, "a");
	assert!(finder
		.find_corresponding(&Node::new("other"), &reference, true)
		.is_none());
}

#[test]
fn test_child_correspondence() {
	let model_a = Node::new("root").with_child(Node::new("item"));
	let model_b = Node::new("root");
	let child = Node::new("item");
	let finder = NameCorrespondence;
	let correspondence = Correspondence::both(&model_a, &model_b).child(&child, &finder, false);
	assert!(correspondence.a.is_some());
	assert!(correspondence.b.is_none());
	assert!(correspondence.pair().is_none());
	let correspondence = Correspondence::absent().child(&child, &finder, true);
	assert_eq!(correspondence, Correspondence::absent());
}
