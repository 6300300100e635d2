use crate::{
	correspondence::Correspondence,
	distribution::{weight_of, DistributionParser},
	engine::RunningLikelihood,
	entropy::{attributes_likelihood, entropy},
	error::Result,
	policy::ScoringPolicy,
	ratio::RatioEstimator,
	trace::DiagnosticSink,
	tree::{Field, Node},
};

/// The result of scoring one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeScore {
	/// The multiplicative contribution of the node to the likelihood.
	pub factor: f64,
	/// The entropy of the node's ratios, for diagnostics.
	pub entropy: f64,
}

/**
A `NodeScorer` computes the factor of a single node. When the node has a match in both models, each of its fields is compared against the distributions recorded under the same field name in the two matching nodes, and the resulting ratios are combined with [`attributes_likelihood`](fn.attributes_likelihood.html). Otherwise the factor is the ratio used when neither model has evidence.
*/
pub struct NodeScorer<'a> {
	estimator: RatioEstimator,
	policy: &'a dyn ScoringPolicy,
	parser: &'a dyn DistributionParser,
}

impl<'a> NodeScorer<'a> {
	pub fn new(
		estimator: RatioEstimator,
		policy: &'a dyn ScoringPolicy,
		parser: &'a dyn DistributionParser,
	) -> Self {
		Self {
			estimator,
			policy,
			parser,
		}
	}

	pub fn policy(&self) -> &'a dyn ScoringPolicy {
		self.policy
	}

	/// Score `node`, multiply `likelihood` by its factor and report the result to `sink`.
	pub fn update_likelihood(
		&self,
		node: &Node,
		correspondence: Correspondence,
		likelihood: &mut RunningLikelihood,
		sink: &mut dyn DiagnosticSink,
	) -> Result<NodeScore> {
		let score = self.score_node(node, correspondence, sink)?;
		likelihood.apply(score.factor);
		sink.end_node(&node.name, score.entropy, score.factor, likelihood.get());
		Ok(score)
	}

	pub fn score_node(
		&self,
		node: &Node,
		correspondence: Correspondence,
		sink: &mut dyn DiagnosticSink,
	) -> Result<NodeScore> {
		if let Some((a, b)) = correspondence.pair() {
			sink.begin_node(&node.name);
			let ratios = self.compute_ratios(&node.fields, a, b, sink)?;
			// A node without comparable fields is scored as if it had no match.
			if !ratios.is_empty() {
				return Ok(NodeScore {
					factor: attributes_likelihood(&ratios)?,
					entropy: entropy(&ratios)?,
				});
			}
		} else {
			sink.new_node(&node.name);
		}
		let ratio = self.estimator.ratio_with_sink(0.0, 0.0, sink)?;
		Ok(NodeScore {
			factor: ratio.value,
			entropy: 0.0,
		})
	}

	fn compute_ratios(
		&self,
		fields: &[Field],
		a: &Node,
		b: &Node,
		sink: &mut dyn DiagnosticSink,
	) -> Result<Vec<f64>> {
		let mut ratios = Vec::with_capacity(fields.len());
		for field in fields {
			if !self.policy.is_ignored_field(&field.name) {
				ratios.push(self.compute_ratio(field, a, b, sink)?);
			}
		}
		Ok(ratios)
	}

	fn compute_ratio(
		&self,
		field: &Field,
		a: &Node,
		b: &Node,
		sink: &mut dyn DiagnosticSink,
	) -> Result<f64> {
		sink.field(&field.name);
		let (numerator, denominator) = match (a.field(&field.name), b.field(&field.name)) {
			(Some(field_a), Some(field_b)) => {
				let couples_a = self.parser.parse(&field_a.value)?;
				let couples_b = self.parser.parse(&field_b.value)?;
				(
					weight_of(&field.value, &couples_a),
					weight_of(&field.value, &couples_b),
				)
			}
			_ => {
				sink.new_field(&field.name);
				(0.0, 0.0)
			}
		};
		let ratio = self
			.estimator
			.ratio_with_sink(numerator, denominator, sink)?;
		Ok(ratio.value)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		distribution::ValueWeightParser,
		error::Error,
		policy::NamePolicy,
		ratio::RatioKind,
		trace::{NoopSink, Recorder, TraceEvent},
	};

	fn assert_close(a: f64, b: f64) {
		assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
	}

	#[test]
	fn test_score_fields() {
		let policy = NamePolicy::default();
		let scorer = NodeScorer::new(RatioEstimator::new(3, 3), &policy, &ValueWeightParser);
		let node = Node::new("item")
			.with_field("color", "red")
			.with_field("size", "big");
		let a = Node::new("item")
			.with_field("color", "red:0.5,blue:0.5")
			.with_field("size", "big:0.2");
		let b = Node::new("item")
			.with_field("color", "red:0.25,blue:0.75")
			.with_field("size", "big:0.4,small:0.6");
		let score = scorer
			.score_node(&node, Correspondence::both(&a, &b), &mut NoopSink)
			.unwrap();
		assert_close(score.factor, 1.0);
		assert_close(score.entropy, 2f64.ln());
	}

	#[test]
	fn test_ignored_and_new_fields() {
		let policy = NamePolicy::new(vec!["id"], Vec::<String>::new());
		let scorer = NodeScorer::new(RatioEstimator::new(3, 1), &policy, &ValueWeightParser);
		let node = Node::new("item")
			.with_field("id", "17")
			.with_field("color", "red")
			.with_field("shape", "round");
		let a = Node::new("item")
			.with_field("color", "red:0.5")
			.with_field("shape", "round:1");
		let b = Node::new("item").with_field("color", "red:0.25");
		let mut recorder = Recorder::new();
		let score = scorer
			.score_node(&node, Correspondence::both(&a, &b), &mut recorder)
			.unwrap();
		// The ratios are 2 for color and 0.25 for shape, which is new to model B.
		assert_close(score.factor, 0.5);
		let fields: Vec<&str> = recorder
			.events
			.iter()
			.filter_map(|event| match event {
				TraceEvent::Field { name } => Some(name.as_str()),
				_ => None,
			})
			.collect();
		assert_eq!(fields, vec!["color", "shape"]);
		assert!(recorder.events.contains(&TraceEvent::NewField {
			name: "shape".to_owned()
		}));
		assert!(recorder.events.contains(&TraceEvent::Ratio {
			ratio: 0.25,
			numerator: 0.0,
			denominator: 0.0,
			kind: RatioKind::BothAbsent,
		}));
	}

	#[test]
	fn test_value_missing_from_distribution() {
		let policy = NamePolicy::default();
		let scorer = NodeScorer::new(RatioEstimator::new(1, 1), &policy, &ValueWeightParser);
		let node = Node::new("item").with_field("color", "green");
		let a = Node::new("item").with_field("color", "red:1");
		let b = Node::new("item").with_field("color", "green:5");
		let score = scorer
			.score_node(&node, Correspondence::both(&a, &b), &mut NoopSink)
			.unwrap();
		assert_eq!(score.factor, 0.1);
	}

	#[test]
	fn test_absent_correspondence() {
		let policy = NamePolicy::default();
		let scorer = NodeScorer::new(RatioEstimator::new(2, 5), &policy, &ValueWeightParser);
		let node = Node::new("item").with_field("color", "red");
		let a = Node::new("item").with_field("color", "red:1");
		let mut recorder = Recorder::new();
		for correspondence in &[
			Correspondence::absent(),
			Correspondence {
				a: Some(&a),
				b: None,
			},
		] {
			let score = scorer
				.score_node(&node, *correspondence, &mut recorder)
				.unwrap();
			assert_eq!(
				score,
				NodeScore {
					factor: 0.3333,
					entropy: 0.0
				}
			);
		}
		assert_eq!(
			recorder.events[0],
			TraceEvent::NewNode {
				name: "item".to_owned()
			}
		);
	}

	#[test]
	fn test_no_comparable_fields() {
		let policy = NamePolicy::new(vec!["id"], Vec::<String>::new());
		let scorer = NodeScorer::new(RatioEstimator::new(1, 1), &policy, &ValueWeightParser);
		let node = Node::new("item").with_field("id", "1");
		let reference = Node::new("item");
		let score = scorer
			.score_node(
				&node,
				Correspondence::both(&reference, &reference),
				&mut NoopSink,
			)
			.unwrap();
		assert_eq!(score.factor, 0.5);
		assert_eq!(score.entropy, 0.0);
	}

	#[test]
	fn test_malformed_distribution() {
		let policy = NamePolicy::default();
		let scorer = NodeScorer::new(RatioEstimator::new(1, 1), &policy, &ValueWeightParser);
		let node = Node::new("item").with_field("color", "red");
		let a = Node::new("item").with_field("color", "red");
		let b = Node::new("item").with_field("color", "red:1");
		let result = scorer.score_node(&node, Correspondence::both(&a, &b), &mut NoopSink);
		assert!(matches!(result, Err(Error::ParseDistribution { .. })));
	}

	#[test]
	fn test_update_likelihood_trace() {
		let policy = NamePolicy::default();
		let scorer = NodeScorer::new(RatioEstimator::new(4, 4), &policy, &ValueWeightParser);
		let node = Node::new("item").with_field("color", "red");
		let a = Node::new("item").with_field("color", "red:3,blue:1");
		let b = Node::new("item").with_field("color", "red:6,blue:2");
		let mut likelihood = RunningLikelihood::new();
		let mut recorder = Recorder::new();
		scorer
			.update_likelihood(
				&node,
				Correspondence::both(&a, &b),
				&mut likelihood,
				&mut recorder,
			)
			.unwrap();
		assert_eq!(likelihood.get(), 0.5);
		insta::assert_debug_snapshot!(recorder.events, @r###"
		[
		    BeginNode {
		        name: "item",
		    },
		    Field {
		        name: "color",
		    },
		    Ratio {
		        ratio: 0.5,
		        numerator: 3.0,
		        denominator: 6.0,
		        kind: Plain,
		    },
		    EndNode {
		        name: "item",
		        entropy: 0.0,
		        factor: 0.5,
		        likelihood: 0.5,
		    },
		]
		"###);
	}
}
