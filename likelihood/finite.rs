use crate::error::Error;
use std::cmp::Ordering;

/**
A ratio that is known to be finite, usable as a map key. Two `Finite`s are equal only when their bit patterns are equal, so grouping by `Finite` groups ratios by exact value.
*/
#[derive(Clone, Copy, Debug)]
pub struct Finite(f64);

impl Finite {
	pub fn new(value: f64) -> Result<Self, Error> {
		if value.is_finite() {
			Ok(Self(value))
		} else {
			Err(Error::InvalidInput(format!("{} is not finite", value)))
		}
	}
}

impl PartialEq for Finite {
	fn eq(&self, other: &Self) -> bool {
		self.0.to_bits() == other.0.to_bits()
	}
}

impl Eq for Finite {}

impl PartialOrd for Finite {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Finite {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

#[test]
fn test_finite() {
	assert!(Finite::new(f64::NAN).is_err());
	assert!(Finite::new(f64::INFINITY).is_err());
	assert_eq!(Finite::new(0.5).unwrap(), Finite::new(0.5).unwrap());
	assert!(Finite::new(0.25).unwrap() < Finite::new(0.5).unwrap());
	assert_ne!(Finite::new(0.0).unwrap(), Finite::new(-0.0).unwrap());
}
