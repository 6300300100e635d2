use crate::{
	error::{Error, Result},
	trace::DiagnosticSink,
};
use num_traits::ToPrimitive;

/// The smallest ratio representable with four decimal places. Ratios that round below it are raised to it, so a factor is never zero.
const MIN_RATIO: f64 = 0.0001;

/// This enum records which smoothing branch produced a [`Ratio`](struct.Ratio.html).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
	/// Both models give the value some weight. The ratio is the plain quotient.
	Plain,
	/// Model A gives the value no weight. The smoothed A-side default is scaled against model B's weight.
	ASmoothed,
	/// Model B gives the value no weight. Model A's weight is scaled against the smoothed B-side default.
	BSmoothed,
	/// Neither model gives the value any weight.
	BothAbsent,
}

/// This enum chooses the ratio used when neither model has evidence for a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BothAbsentDefault {
	/// `1 / (size_a + 1)`. This is the default. It is asymmetric and favors neither model only when `size_a == size_b`.
	SizeA,
	/// `1 / (size_b + 1)`.
	SizeB,
	/// `1`, so a value unknown to both models does not move the likelihood.
	Unit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ratio {
	pub value: f64,
	pub kind: RatioKind,
}

/**
A `RatioEstimator` computes the ratio between the weight model A and the weight model B give to a value. Zero weights are smoothed using the number of samples each model was built from, so the ratio is never zero or undefined. All ratios are rounded to four decimal places.
*/
#[derive(Clone, Debug)]
pub struct RatioEstimator {
	size_a: u64,
	size_b: u64,
	both_absent_default: BothAbsentDefault,
}

impl RatioEstimator {
	pub fn new(size_a: u64, size_b: u64) -> Self {
		Self {
			size_a,
			size_b,
			both_absent_default: BothAbsentDefault::SizeA,
		}
	}

	pub fn with_both_absent_default(mut self, both_absent_default: BothAbsentDefault) -> Self {
		self.both_absent_default = both_absent_default;
		self
	}

	pub fn ratio(&self, numerator: f64, denominator: f64) -> Result<Ratio> {
		self.ratio_with_sink(numerator, denominator, &mut crate::trace::NoopSink)
	}

	/// Compute the ratio and report the branch that fired to `sink`.
	pub fn ratio_with_sink(
		&self,
		numerator: f64,
		denominator: f64,
		sink: &mut dyn DiagnosticSink,
	) -> Result<Ratio> {
		for weight in &[numerator, denominator] {
			if !weight.is_finite() || *weight < 0.0 {
				return Err(Error::InvalidInput(format!(
					"weight {} is not a finite non-negative number",
					weight
				)));
			}
		}
		let (value, kind) = if numerator == 0.0 && denominator == 0.0 {
			(self.both_absent(), RatioKind::BothAbsent)
		} else if numerator == 0.0 {
			(smoothed(self.size_b) / denominator, RatioKind::ASmoothed)
		} else if denominator == 0.0 {
			(numerator / smoothed(self.size_a), RatioKind::BSmoothed)
		} else {
			(numerator / denominator, RatioKind::Plain)
		};
		let value = round(value, 4);
		if !value.is_finite() {
			return Err(Error::InvalidInput(format!(
				"ratio of {} to {} is not finite",
				numerator, denominator
			)));
		}
		let ratio = Ratio {
			value: value.max(MIN_RATIO),
			kind,
		};
		sink.ratio(ratio, numerator, denominator);
		Ok(ratio)
	}

	fn both_absent(&self) -> f64 {
		match self.both_absent_default {
			BothAbsentDefault::SizeA => smoothed(self.size_a),
			BothAbsentDefault::SizeB => smoothed(self.size_b),
			BothAbsentDefault::Unit => 1.0,
		}
	}
}

/// The weight of a value a model has never seen, given the number of samples the model was built from.
fn smoothed(size: u64) -> f64 {
	1.0 / (size.to_f64().unwrap() + 1.0)
}

fn round(value: f64, places: i32) -> f64 {
	let scale = 10f64.powi(places);
	(value * scale).round() / scale
}

#[test]
fn test_both_absent() {
	let estimator = RatioEstimator::new(2, 7);
	let ratio = estimator.ratio(0.0, 0.0).unwrap();
	assert_eq!(ratio.value, 0.3333);
	assert_eq!(ratio.kind, RatioKind::BothAbsent);
}

#[test]
fn test_a_smoothed() {
	let ratio = RatioEstimator::new(9, 1).ratio(0.0, 5.0).unwrap();
	assert_eq!(ratio.value, 0.1);
	assert_eq!(ratio.kind, RatioKind::ASmoothed);
}

#[test]
fn test_b_smoothed() {
	let ratio = RatioEstimator::new(1, 9).ratio(5.0, 0.0).unwrap();
	assert_eq!(ratio.value, 10.0);
	assert_eq!(ratio.kind, RatioKind::BSmoothed);
}

#[test]
fn test_plain() {
	for &(size_a, size_b) in &[(0, 0), (1, 5), (100, 3)] {
		let ratio = RatioEstimator::new(size_a, size_b).ratio(3.0, 6.0).unwrap();
		assert_eq!(ratio.value, 0.5);
		assert_eq!(ratio.kind, RatioKind::Plain);
	}
	// Plain ratios are not capped.
	assert_eq!(RatioEstimator::new(0, 0).ratio(6.0, 3.0).unwrap().value, 2.0);
}

#[test]
fn test_both_absent_default() {
	let estimator = RatioEstimator::new(2, 3);
	let size_b = estimator
		.clone()
		.with_both_absent_default(BothAbsentDefault::SizeB)
		.ratio(0.0, 0.0)
		.unwrap();
	assert_eq!(size_b.value, 0.25);
	let unit = estimator
		.with_both_absent_default(BothAbsentDefault::Unit)
		.ratio(0.0, 0.0)
		.unwrap();
	assert_eq!(unit.value, 1.0);
}

#[test]
fn test_rounding() {
	let estimator = RatioEstimator::new(0, 0);
	assert_eq!(estimator.ratio(1.0, 3.0).unwrap().value, 0.3333);
	assert_eq!(estimator.ratio(2.0, 3.0).unwrap().value, 0.6667);
	// Ratios that round to zero are raised to the smallest representable ratio.
	assert_eq!(estimator.ratio(1.0, 1_000_000.0).unwrap().value, MIN_RATIO);
}

#[test]
fn test_invalid_weights() {
	let estimator = RatioEstimator::new(0, 0);
	assert!(estimator.ratio(-1.0, 2.0).is_err());
	assert!(estimator.ratio(1.0, f64::NAN).is_err());
	assert!(estimator.ratio(f64::INFINITY, 1.0).is_err());
	assert!(estimator.ratio(1e300, 1e-300).is_err());
}
