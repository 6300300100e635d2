/*!
This crate scores how well an observed tree matches one of two reference models. Each reference model is a tree whose fields hold value-frequency distributions instead of single values. The [`TreeLikelihoodEngine`](struct.TreeLikelihoodEngine.html) walks the observed tree, finds the corresponding node in each reference tree, and multiplies a [`RunningLikelihood`](struct.RunningLikelihood.html) by one factor per visited node. A likelihood above 1 favors model A and a likelihood below 1 favors model B.

# Example

```
use vft_likelihood::{
	Correspondence, NameCorrespondence, NamePolicy, Node, NoopSink, Options,
	TreeLikelihoodEngine, ValueWeightParser,
};

let observed = Node::new("root").with_child(Node::new("item").with_field("color", "red"));
let model_a = Node::new("root").with_child(Node::new("item").with_field("color", "red:3,blue:1"));
let model_b = Node::new("root").with_child(Node::new("item").with_field("color", "red:6,blue:2"));

let finder = NameCorrespondence;
let policy = NamePolicy::default();
let parser = ValueWeightParser;
let engine = TreeLikelihoodEngine::new(Options::default(), &finder, &policy, &parser);
let likelihood = engine
	.evaluate(&observed, Correspondence::both(&model_a, &model_b), &mut NoopSink)
	.unwrap();
assert_eq!(likelihood.get(), 0.5);
```
*/

#![allow(clippy::tabs_in_doc_comments)]

mod correspondence;
mod distribution;
mod engine;
mod entropy;
mod error;
mod finite;
mod policy;
mod ratio;
mod scorer;
mod trace;
mod tree;
mod verdict;

pub use self::correspondence::{Correspondence, CorrespondenceFinder, NameCorrespondence};
pub use self::distribution::{weight_of, DistributionParser, ValueWeightParser};
pub use self::engine::{RunningLikelihood, TreeLikelihoodEngine};
pub use self::entropy::{attributes_likelihood, entropies, entropy, exponents};
pub use self::error::{Error, Result};
pub use self::policy::{NamePolicy, ScoringPolicy};
pub use self::ratio::{BothAbsentDefault, Ratio, RatioEstimator, RatioKind};
pub use self::scorer::{NodeScore, NodeScorer};
pub use self::trace::{DiagnosticSink, LogSink, NoopSink, Recorder, TraceEvent};
pub use self::tree::{Field, Node, ObservedNode, ReferenceNode};
pub use self::verdict::Verdict;

/// These are the options passed to [`TreeLikelihoodEngine::new`](struct.TreeLikelihoodEngine.html#method.new).
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
	/// The number of samples model A was built from. It controls how strongly a weight that is missing from model A is smoothed.
	pub size_a: u64,
	/// The number of samples model B was built from. It controls how strongly a weight that is missing from model B is smoothed.
	pub size_b: u64,
	/// This option chooses the ratio used when neither model has any evidence for a value.
	pub both_absent_default: BothAbsentDefault,
	/// A likelihood above `threshold` favors model A and a likelihood below `1 / threshold` favors model B. It must be at least 1.
	pub threshold: f64,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			size_a: 0,
			size_b: 0,
			both_absent_default: BothAbsentDefault::SizeA,
			threshold: 1.0,
		}
	}
}
