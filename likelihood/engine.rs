use crate::{
	correspondence::{Correspondence, CorrespondenceFinder},
	distribution::DistributionParser,
	error::Result,
	policy::ScoringPolicy,
	ratio::RatioEstimator,
	scorer::NodeScorer,
	trace::DiagnosticSink,
	tree::Node,
	verdict::Verdict,
	Options,
};

/**
The running product of the factors of all nodes visited so far in one evaluation. Each evaluation owns its own `RunningLikelihood`, so independent evaluations never share state.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct RunningLikelihood {
	likelihood: f64,
	log_likelihood: f64,
	n_factors: usize,
}

impl Default for RunningLikelihood {
	fn default() -> Self {
		Self {
			likelihood: 1.0,
			log_likelihood: 0.0,
			n_factors: 0,
		}
	}
}

impl RunningLikelihood {
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a new evaluation.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn get(&self) -> f64 {
		self.likelihood
	}

	/// The sum of the natural logs of the factors. It stays finite for deep trees where the product underflows.
	pub fn log_likelihood(&self) -> f64 {
		self.log_likelihood
	}

	/// The number of factors applied since the last reset.
	pub fn factors(&self) -> usize {
		self.n_factors
	}

	pub(crate) fn apply(&mut self, factor: f64) {
		self.likelihood *= factor;
		self.log_likelihood += factor.ln();
		self.n_factors += 1;
	}
}

/**
The `TreeLikelihoodEngine` walks an observed tree depth first. For each child of each visited node, it resolves the child's correspondence in both models, scores the child with a [`NodeScorer`](struct.NodeScorer.html) and descends into it. The root itself is never scored.
*/
pub struct TreeLikelihoodEngine<'a> {
	scorer: NodeScorer<'a>,
	finder: &'a dyn CorrespondenceFinder,
	threshold: f64,
}

impl<'a> TreeLikelihoodEngine<'a> {
	pub fn new(
		options: Options,
		finder: &'a dyn CorrespondenceFinder,
		policy: &'a dyn ScoringPolicy,
		parser: &'a dyn DistributionParser,
	) -> Self {
		let estimator = RatioEstimator::new(options.size_a, options.size_b)
			.with_both_absent_default(options.both_absent_default);
		Self {
			scorer: NodeScorer::new(estimator, policy, parser),
			finder,
			threshold: options.threshold,
		}
	}

	/// Evaluate `root` on a fresh [`RunningLikelihood`](struct.RunningLikelihood.html).
	pub fn evaluate(
		&self,
		root: &Node,
		correspondence: Correspondence,
		sink: &mut dyn DiagnosticSink,
	) -> Result<RunningLikelihood> {
		let mut likelihood = RunningLikelihood::new();
		self.compute_likelihood(root, correspondence, &mut likelihood, sink)?;
		log::info!(
			"scored {} nodes of {}, likelihood {}",
			likelihood.factors(),
			root.name,
			likelihood.get()
		);
		Ok(likelihood)
	}

	/// Evaluate `root` and decide which model explains it better.
	pub fn classify(
		&self,
		root: &Node,
		correspondence: Correspondence,
		sink: &mut dyn DiagnosticSink,
	) -> Result<(RunningLikelihood, Verdict)> {
		let likelihood = self.evaluate(root, correspondence, sink)?;
		let verdict = Verdict::from_likelihood(likelihood.get(), self.threshold);
		Ok((likelihood, verdict))
	}

	/// Multiply `likelihood` by the factor of every descendant of `node` that is not unused. `correspondence` is the match of `node` itself in both models.
	pub fn compute_likelihood(
		&self,
		node: &Node,
		correspondence: Correspondence,
		likelihood: &mut RunningLikelihood,
		sink: &mut dyn DiagnosticSink,
	) -> Result<()> {
		if node.is_leaf() {
			return Ok(());
		}
		let policy = self.scorer.policy();
		// Once a child is unused, every later sibling is matched with the unused flag set.
		node.children
			.iter()
			.try_fold(false, |unused_seen, child| -> Result<bool> {
				let unused = policy.is_unused_node(child);
				let unused_seen = unused_seen || unused;
				if !unused {
					let child_correspondence = correspondence.child(child, self.finder, unused_seen);
					self.scorer
						.update_likelihood(child, child_correspondence, likelihood, sink)?;
					self.compute_likelihood(child, child_correspondence, likelihood, sink)?;
				}
				Ok(unused_seen)
			})?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		correspondence::NameCorrespondence,
		distribution::ValueWeightParser,
		policy::NamePolicy,
		trace::{NoopSink, Recorder, TraceEvent},
	};
	use std::cell::RefCell;

	/// Records the unused flag of every lookup and matches by name only.
	#[derive(Default)]
	struct RecordingFinder {
		lookups: RefCell<Vec<(String, bool)>>,
	}

	impl CorrespondenceFinder for RecordingFinder {
		fn find_corresponding<'r>(
			&self,
			child: &Node,
			reference_parent: &'r Node,
			unused: bool,
		) -> Option<&'r Node> {
			self.lookups.borrow_mut().push((child.name.clone(), unused));
			reference_parent
				.children
				.iter()
				.find(|candidate| candidate.name == child.name)
		}
	}

	fn options(size_a: u64, size_b: u64) -> Options {
		Options {
			size_a,
			size_b,
			..Options::default()
		}
	}

	fn chain(names: &[&str]) -> Node {
		names.iter().rev().fold(None, |child: Option<Node>, name| {
			let node = Node::new(*name)
				.with_field("color", "red")
				.with_field("size", "big");
			Some(match child {
				Some(child) => node.with_child(child),
				None => node,
			})
		})
		.unwrap()
	}

	fn models() -> (Node, Node, Node) {
		let observed = Node::new("root")
			.with_child(
				Node::new("item")
					.with_field("color", "red")
					.with_child(Node::new("part").with_field("shape", "round")),
			)
			.with_child(Node::new("item").with_field("color", "blue"));
		let model_a = Node::new("root").with_child(
			Node::new("item")
				.with_field("color", "red:2,blue:2")
				.with_child(Node::new("part").with_field("shape", "round:1,square:3")),
		);
		let model_b = Node::new("root").with_child(
			Node::new("item")
				.with_field("color", "red:4,blue:8")
				.with_child(Node::new("part").with_field("shape", "round:4")),
		);
		(observed, model_a, model_b)
	}

	#[test]
	fn test_root_is_not_scored() {
		let finder = NameCorrespondence;
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(1, 1), &finder, &policy, &ValueWeightParser);
		let root = Node::new("root").with_field("color", "red");
		let likelihood = engine
			.evaluate(&root, Correspondence::absent(), &mut NoopSink)
			.unwrap();
		assert_eq!(likelihood.get(), 1.0);
		assert_eq!(likelihood.factors(), 0);
	}

	#[test]
	fn test_compute_likelihood() {
		let (observed, model_a, model_b) = models();
		let finder = RecordingFinder::default();
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(1, 1), &finder, &policy, &ValueWeightParser);
		let mut recorder = Recorder::new();
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&model_a, &model_b),
				&mut recorder,
			)
			.unwrap();
		// item: red 2/4, part: round 1/4, second item: blue 2/8.
		assert_eq!(likelihood.get(), 0.5 * 0.25 * 0.25);
		assert_eq!(likelihood.factors(), 3);
		let factors: Vec<(String, f64)> = recorder
			.events
			.into_iter()
			.filter_map(|event| match event {
				TraceEvent::EndNode { name, factor, .. } => Some((name, factor)),
				_ => None,
			})
			.collect();
		assert_eq!(
			factors,
			vec![
				("item".to_owned(), 0.5),
				("part".to_owned(), 0.25),
				("item".to_owned(), 0.25),
			]
		);
	}

	#[test]
	fn test_reset_and_determinism() {
		let (observed, model_a, model_b) = models();
		let finder = NameCorrespondence;
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(3, 2), &finder, &policy, &ValueWeightParser);
		let correspondence = Correspondence::both(&model_a, &model_b);
		let mut likelihood = RunningLikelihood::new();
		engine
			.compute_likelihood(&observed, correspondence, &mut likelihood, &mut NoopSink)
			.unwrap();
		let first = likelihood.get();
		likelihood.reset();
		assert_eq!(likelihood, RunningLikelihood::new());
		engine
			.compute_likelihood(&observed, correspondence, &mut likelihood, &mut NoopSink)
			.unwrap();
		assert_eq!(likelihood.get(), first);
	}

	#[test]
	fn test_likelihood_below_one() {
		let (observed, model_a, model_b) = models();
		let finder = RecordingFinder::default();
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(5, 5), &finder, &policy, &ValueWeightParser);
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&model_a, &model_b),
				&mut NoopSink,
			)
			.unwrap();
		assert!(likelihood.get() > 0.0);
		assert!(likelihood.get() < 1.0);
		// Identical models give every field a ratio of exactly 1.
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&model_a, &model_a),
				&mut NoopSink,
			)
			.unwrap();
		assert_eq!(likelihood.get(), 1.0);
		// A node unknown to both models pulls the likelihood below 1.
		let observed = observed.with_child(Node::new("extra").with_field("color", "red"));
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&model_a, &model_a),
				&mut NoopSink,
			)
			.unwrap();
		assert_eq!(likelihood.get(), 0.1667);
	}

	#[test]
	fn test_absent_subtree() {
		let finder = NameCorrespondence;
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(2, 9), &finder, &policy, &ValueWeightParser);
		let observed = Node::new("root").with_child(chain(&["a", "b", "c"]));
		let model_a = Node::new("root").with_child(Node::new("other"));
		let model_b = Node::new("root");
		let mut recorder = Recorder::new();
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&model_a, &model_b),
				&mut recorder,
			)
			.unwrap();
		let default = 0.3333;
		assert_eq!(likelihood.get(), default * default * default);
		assert!((likelihood.log_likelihood() - 3.0 * f64::ln(default)).abs() < 1e-12);
		let new_nodes = recorder
			.events
			.iter()
			.filter(|event| matches!(event, TraceEvent::NewNode { .. }))
			.count();
		assert_eq!(new_nodes, 3);
	}

	#[test]
	fn test_unused_nodes() {
		let finder = RecordingFinder::default();
		let policy = NamePolicy::new(Vec::<String>::new(), vec!["comment"]);
		let engine = TreeLikelihoodEngine::new(options(1, 1), &finder, &policy, &ValueWeightParser);
		let observed = Node::new("root")
			.with_child(Node::new("first").with_child(Node::new("nested")))
			.with_child(Node::new("comment").with_child(Node::new("hidden")))
			.with_child(Node::new("second"))
			.with_child(Node::new("third"));
		let reference = Node::new("root");
		let likelihood = engine
			.evaluate(
				&observed,
				Correspondence::both(&reference, &reference),
				&mut NoopSink,
			)
			.unwrap();
		// first, nested, second and third are scored. comment and hidden are skipped.
		assert_eq!(likelihood.factors(), 4);
		assert_eq!(
			*finder.lookups.borrow(),
			vec![
				("first".to_owned(), false),
				("first".to_owned(), false),
				("second".to_owned(), true),
				("second".to_owned(), true),
				("third".to_owned(), true),
				("third".to_owned(), true),
			]
		);
	}

	#[test]
	fn test_classify() {
		let (observed, model_a, model_b) = models();
		let finder = NameCorrespondence;
		let policy = NamePolicy::default();
		let engine = TreeLikelihoodEngine::new(options(1, 1), &finder, &policy, &ValueWeightParser);
		let (_, verdict) = engine
			.classify(
				&observed,
				Correspondence::both(&model_a, &model_b),
				&mut NoopSink,
			)
			.unwrap();
		assert_eq!(verdict, Verdict::ModelB);
		let (_, verdict) = engine
			.classify(
				&observed,
				Correspondence::both(&model_b, &model_a),
				&mut NoopSink,
			)
			.unwrap();
		assert_eq!(verdict, Verdict::ModelA);
	}
}
