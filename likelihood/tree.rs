/// A named attribute of a [`Node`](struct.Node.html). On an observed node the value is a single value. On a reference node it is a serialized distribution such as `"red:0.75,blue:0.25"`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Field {
	pub name: String,
	pub value: String,
}

/// Trees are stored as nested `Node`s. Fields and children keep their input order.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Node {
	pub name: String,
	#[serde(default)]
	pub fields: Vec<Field>,
	#[serde(default)]
	pub children: Vec<Node>,
}

/// A node of the tree being scored.
pub type ObservedNode = Node;

/// A node of a reference model, whose fields hold distributions.
pub type ReferenceNode = Node;

impl Node {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
			children: Vec::new(),
		}
	}

	pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.push(Field {
			name: name.into(),
			value: value.into(),
		});
		self
	}

	pub fn with_child(mut self, child: Node) -> Self {
		self.children.push(child);
		self
	}

	/// Return the first field named `name`.
	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name == name)
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

#[test]
fn test_build() {
	let node = Node::new("item")
		.with_field("color", "red")
		.with_field("color", "blue")
		.with_child(Node::new("part"));
	assert_eq!(node.field("color").unwrap().value, "red");
	assert!(node.field("size").is_none());
	assert!(!node.is_leaf());
	assert!(node.children[0].is_leaf());
}
