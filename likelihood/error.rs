use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
	/// A numeric precondition was violated, such as an empty ratio list or a weight that is negative or not finite.
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// A serialized distribution could not be parsed.
	#[error("failed to parse distribution \"{input}\": {reason}")]
	ParseDistribution { input: String, reason: String },
}
