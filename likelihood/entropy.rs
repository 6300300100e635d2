/*!
This module combines the ratios computed for the fields of one node into a single factor. Each ratio is raised to an exponent derived from how often its value repeats within the node, so that fields whose ratios repeat are discounted relative to fields that vary.
*/

use crate::{
	error::{Error, Result},
	finite::Finite,
};
use itertools::izip;
use num_traits::ToPrimitive;
use std::collections::BTreeMap;

/// Count the occurrences of each distinct ratio.
fn occurrences(ratios: &[f64]) -> Result<BTreeMap<Finite, usize>> {
	if ratios.is_empty() {
		return Err(Error::InvalidInput(
			"cannot weight an empty list of ratios".to_owned(),
		));
	}
	let mut occurrences = BTreeMap::new();
	for ratio in ratios.iter() {
		*occurrences.entry(Finite::new(*ratio)?).or_insert(0) += 1;
	}
	Ok(occurrences)
}

/// Compute the Shannon entropy, using the natural log, of the distribution of values in `ratios`. This is reported for diagnostics only. The exponents use the normalized per-ratio contributions computed by [`entropies`](fn.entropies.html).
pub fn entropy(ratios: &[f64]) -> Result<f64> {
	let n = ratios.len().to_f64().unwrap();
	let mut entropy = 0.0;
	for count in occurrences(ratios)?.values() {
		let x = count.to_f64().unwrap() / n;
		entropy -= x * x.ln();
	}
	Ok(entropy)
}

/**
Compute the normalized entropy contribution of each ratio, in input order. The contribution of a ratio is `-norm * x * ln(x)` where `x` is the relative frequency of that ratio's own value in `ratios` and `norm` is `n / ln(n)`, or 1 when there is a single ratio.
*/
pub fn entropies(ratios: &[f64]) -> Result<Vec<f64>> {
	let occurrences = occurrences(ratios)?;
	let n = ratios.len().to_f64().unwrap();
	let norm = if ratios.len() == 1 { 1.0 } else { n / n.ln() };
	ratios
		.iter()
		.map(|ratio| -> Result<f64> {
			let occurrence = occurrences[&Finite::new(*ratio)?].to_f64().unwrap();
			let x = occurrence / n;
			Ok(-norm * (x * x.ln()))
		})
		.collect()
}

/// Compute the exponent for each ratio, in input order. The exponent ranges from `1 / n` for a ratio whose value fills the whole list up to about 1 for a ratio whose value is unique.
pub fn exponents(ratios: &[f64]) -> Result<Vec<f64>> {
	let n = ratios.len().to_f64().unwrap();
	let exponents = entropies(ratios)?
		.into_iter()
		.map(|entropy| ((n - 1.0) * entropy + 1.0) / n)
		.collect();
	Ok(exponents)
}

/// Combine `ratios` into one factor, the product of each ratio raised to its exponent.
pub fn attributes_likelihood(ratios: &[f64]) -> Result<f64> {
	let exponents = exponents(ratios)?;
	let likelihood = izip!(ratios, exponents.iter())
		.fold(1.0, |likelihood, (ratio, exponent)| {
			likelihood * ratio.powf(*exponent)
		});
	Ok(likelihood)
}

#[cfg(test)]
fn assert_close(a: f64, b: f64) {
	assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
}

#[test]
fn test_empty() {
	assert!(entropy(&[]).is_err());
	assert!(exponents(&[]).is_err());
	assert!(attributes_likelihood(&[]).is_err());
}

#[test]
fn test_not_finite() {
	assert!(exponents(&[0.5, f64::NAN]).is_err());
	assert!(entropy(&[f64::INFINITY]).is_err());
}

#[test]
fn test_single_ratio() {
	for &ratio in &[0.0001, 0.5, 1.0, 42.0] {
		assert_eq!(exponents(&[ratio]).unwrap(), vec![1.0]);
		assert_eq!(attributes_likelihood(&[ratio]).unwrap(), ratio);
		assert_eq!(entropy(&[ratio]).unwrap(), 0.0);
	}
}

#[test]
fn test_identical_ratios() {
	let ratios = [0.5, 0.5, 0.5];
	assert_eq!(entropy(&ratios).unwrap(), 0.0);
	for entropy in entropies(&ratios).unwrap() {
		assert_eq!(entropy, 0.0);
	}
	assert_eq!(exponents(&ratios).unwrap(), vec![1.0 / 3.0; 3]);
	assert_close(attributes_likelihood(&ratios).unwrap(), 0.5);
}

#[test]
fn test_distinct_ratios() {
	let ratios = [2.0, 0.5];
	assert_close(entropy(&ratios).unwrap(), 2f64.ln());
	for exponent in exponents(&ratios).unwrap() {
		assert_close(exponent, 1.0);
	}
	assert_close(attributes_likelihood(&ratios).unwrap(), 1.0);
}

#[test]
fn test_repeated_ratio() {
	let ratios = [0.5, 0.25, 0.5];
	let entropies = entropies(&ratios).unwrap();
	let repeated = -2.0 * (2.0f64 / 3.0).ln() / 3f64.ln();
	assert_close(entropies[0], repeated);
	assert_close(entropies[1], 1.0);
	assert_close(entropies[2], repeated);
	let exponents = exponents(&ratios).unwrap();
	assert_close(exponents[0], (2.0 * repeated + 1.0) / 3.0);
	assert_close(exponents[1], 1.0);
	assert_eq!(exponents[0], exponents[2]);
	// The plain diagnostic entropy is not normalized.
	let expected = -(2.0f64 / 3.0) * (2.0f64 / 3.0).ln() - (1.0f64 / 3.0) * (1.0f64 / 3.0).ln();
	assert_close(entropy(&ratios).unwrap(), expected);
}
