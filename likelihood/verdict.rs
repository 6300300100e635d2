/// Which reference model better explains an observed tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
	ModelA,
	ModelB,
	Undecided,
}

impl Verdict {
	/// A likelihood above `threshold` favors model A, a likelihood below `1 / threshold` favors model B, and anything in between is undecided. A `threshold` below 1 is treated as 1.
	pub fn from_likelihood(likelihood: f64, threshold: f64) -> Self {
		let threshold = threshold.max(1.0);
		if likelihood > threshold {
			Verdict::ModelA
		} else if likelihood < 1.0 / threshold {
			Verdict::ModelB
		} else {
			Verdict::Undecided
		}
	}
}

impl std::fmt::Display for Verdict {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Verdict::ModelA => write!(f, "model a"),
			Verdict::ModelB => write!(f, "model b"),
			Verdict::Undecided => write!(f, "undecided"),
		}
	}
}

#[test]
fn test_verdict() {
	assert_eq!(Verdict::from_likelihood(1.5, 1.0), Verdict::ModelA);
	assert_eq!(Verdict::from_likelihood(0.5, 1.0), Verdict::ModelB);
	assert_eq!(Verdict::from_likelihood(1.0, 1.0), Verdict::Undecided);
	assert_eq!(Verdict::from_likelihood(1.5, 2.0), Verdict::Undecided);
	assert_eq!(Verdict::from_likelihood(0.6, 2.0), Verdict::Undecided);
	assert_eq!(Verdict::from_likelihood(0.4, 2.0), Verdict::ModelB);
	assert_eq!(Verdict::from_likelihood(0.5, 0.1), Verdict::ModelB);
}
