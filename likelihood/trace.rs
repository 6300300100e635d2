/*!
This module defines the [`DiagnosticSink`](trait.DiagnosticSink.html) trait, which receives a trace of the scoring of each visited node. Sinks only observe, they never change the computed likelihood.
*/

use crate::ratio::{Ratio, RatioKind};

pub trait DiagnosticSink {
	/// A node with a match in both models is about to be scored field by field.
	fn begin_node(&mut self, _name: &str) {}
	/// A node without a match in both models is about to be scored with the default ratio.
	fn new_node(&mut self, _name: &str) {}
	/// A field is about to be compared.
	fn field(&mut self, _name: &str) {}
	/// The field is missing from at least one of the models.
	fn new_field(&mut self, _name: &str) {}
	/// A ratio was computed from `numerator` and `denominator`.
	fn ratio(&mut self, _ratio: Ratio, _numerator: f64, _denominator: f64) {}
	/// A node was scored and its factor was applied to the running likelihood.
	fn end_node(&mut self, _name: &str, _entropy: f64, _factor: f64, _likelihood: f64) {}
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// A sink that writes the trace to the `log` facade. Nodes are logged at `debug` level and fields and ratios at `trace` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
	fn begin_node(&mut self, name: &str) {
		log::debug!("<{}>", name);
	}

	fn new_node(&mut self, name: &str) {
		log::debug!("<{}> (new)", name);
	}

	fn field(&mut self, name: &str) {
		log::trace!("  field {}", name);
	}

	fn new_field(&mut self, name: &str) {
		log::trace!("  field {} (new)", name);
	}

	fn ratio(&mut self, ratio: Ratio, numerator: f64, denominator: f64) {
		let reason = match ratio.kind {
			RatioKind::Plain => "plain",
			RatioKind::ASmoothed => "a smoothed",
			RatioKind::BSmoothed => "b smoothed",
			RatioKind::BothAbsent => "both absent",
		};
		log::trace!(
			"  ratio {} = {} / {} ({})",
			ratio.value,
			numerator,
			denominator,
			reason
		);
	}

	fn end_node(&mut self, name: &str, entropy: f64, factor: f64, likelihood: f64) {
		log::debug!(
			"</{}> entropy {} factor {} likelihood {}",
			name,
			entropy,
			factor,
			likelihood
		);
	}
}

/// A single entry of the trace collected by a [`Recorder`](struct.Recorder.html).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
	BeginNode {
		name: String,
	},
	NewNode {
		name: String,
	},
	Field {
		name: String,
	},
	NewField {
		name: String,
	},
	Ratio {
		ratio: f64,
		numerator: f64,
		denominator: f64,
		kind: RatioKind,
	},
	EndNode {
		name: String,
		entropy: f64,
		factor: f64,
		likelihood: f64,
	},
}

/// A sink that collects the trace in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
	pub events: Vec<TraceEvent>,
}

impl Recorder {
	pub fn new() -> Self {
		Self::default()
	}
}

impl DiagnosticSink for Recorder {
	fn begin_node(&mut self, name: &str) {
		self.events.push(TraceEvent::BeginNode {
			name: name.to_owned(),
		});
	}

	fn new_node(&mut self, name: &str) {
		self.events.push(TraceEvent::NewNode {
			name: name.to_owned(),
		});
	}

	fn field(&mut self, name: &str) {
		self.events.push(TraceEvent::Field {
			name: name.to_owned(),
		});
	}

	fn new_field(&mut self, name: &str) {
		self.events.push(TraceEvent::NewField {
			name: name.to_owned(),
		});
	}

	fn ratio(&mut self, ratio: Ratio, numerator: f64, denominator: f64) {
		self.events.push(TraceEvent::Ratio {
			ratio: ratio.value,
			numerator,
			denominator,
			kind: ratio.kind,
		});
	}

	fn end_node(&mut self, name: &str, entropy: f64, factor: f64, likelihood: f64) {
		self.events.push(TraceEvent::EndNode {
			name: name.to_owned(),
			entropy,
			factor,
			likelihood,
		});
	}
}
