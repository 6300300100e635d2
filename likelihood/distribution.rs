use crate::error::{Error, Result};

/// A `DistributionParser` turns the serialized value of a reference field into `(value, weight)` pairs, in order.
pub trait DistributionParser {
	fn parse(&self, serialized: &str) -> Result<Vec<(String, f64)>>;
}

/**
The default [`DistributionParser`](trait.DistributionParser.html). It parses comma separated `value:weight` pairs such as `"red:0.75,blue:0.25"`. Each pair is split at its last colon, so values may themselves contain colons. Whitespace around values and weights is trimmed and empty pairs are skipped. Weights must be finite and non-negative.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueWeightParser;

impl DistributionParser for ValueWeightParser {
	fn parse(&self, serialized: &str) -> Result<Vec<(String, f64)>> {
		let error = |reason: String| Error::ParseDistribution {
			input: serialized.to_owned(),
			reason,
		};
		let mut couples = Vec::new();
		for couple in serialized.split(',') {
			let couple = couple.trim();
			if couple.is_empty() {
				continue;
			}
			let (value, weight) = couple
				.rsplit_once(':')
				.ok_or_else(|| error(format!("\"{}\" has no weight", couple)))?;
			let weight: f64 = weight
				.trim()
				.parse()
				.map_err(|_| error(format!("\"{}\" is not a number", weight.trim())))?;
			if !weight.is_finite() || weight < 0.0 {
				return Err(error(format!("weight {} is negative or not finite", weight)));
			}
			couples.push((value.trim().to_owned(), weight));
		}
		Ok(couples)
	}
}

/// Return the weight of the first couple whose value equals `value`, or 0 if there is none.
pub fn weight_of(value: &str, couples: &[(String, f64)]) -> f64 {
	couples
		.iter()
		.find(|(couple_value, _)| couple_value == value)
		.map(|(_, weight)| *weight)
		.unwrap_or(0.0)
}

#[test]
fn test_parse() {
	let couples = ValueWeightParser.parse("red:0.75, blue : 0.25,").unwrap();
	assert_eq!(
		couples,
		vec![("red".to_owned(), 0.75), ("blue".to_owned(), 0.25)]
	);
	let couples = ValueWeightParser.parse("12:30:2").unwrap();
	assert_eq!(couples, vec![("12:30".to_owned(), 2.0)]);
	assert!(ValueWeightParser.parse("").unwrap().is_empty());
}

#[test]
fn test_parse_error() {
	assert!(ValueWeightParser.parse("red").is_err());
	assert!(ValueWeightParser.parse("red:many").is_err());
	assert!(ValueWeightParser.parse("red:-1").is_err());
	assert!(ValueWeightParser.parse("red:inf").is_err());
	match ValueWeightParser.parse("red:1,blue") {
		Err(Error::ParseDistribution { input, .. }) => assert_eq!(input, "red:1,blue"),
		_ => panic!("expected a parse error"),
	}
}

#[test]
fn test_weight_of() {
	let couples = vec![
		("red".to_owned(), 3.0),
		("blue".to_owned(), 1.0),
		("red".to_owned(), 9.0),
	];
	assert_eq!(weight_of("red", &couples), 3.0);
	assert_eq!(weight_of("blue", &couples), 1.0);
	assert_eq!(weight_of("green", &couples), 0.0);
}
