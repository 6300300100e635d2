/*!
This module defines the `Config` struct, which is read from the yaml file passed with `--config`. Every setting is optional, and settings passed on the command line take precedence.
*/

use anyhow::{format_err, Context, Result};
use std::path::Path;
use vft_likelihood::{BothAbsentDefault, NamePolicy, Options};

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub size_a: Option<u64>,
	pub size_b: Option<u64>,
	pub both_absent_default: Option<BothAbsentDefault>,
	pub threshold: Option<f64>,
	#[serde(default)]
	pub ignored_fields: Vec<String>,
	#[serde(default)]
	pub unused_nodes: Vec<String>,
}

/// Overrides passed on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
	pub size_a: Option<u64>,
	pub size_b: Option<u64>,
	pub threshold: Option<f64>,
}

impl Config {
	pub fn options(&self, overrides: &Overrides) -> Result<Options> {
		let defaults = Options::default();
		let threshold = overrides
			.threshold
			.or(self.threshold)
			.unwrap_or(defaults.threshold);
		if !threshold.is_finite() || threshold < 1.0 {
			return Err(format_err!(
				"the threshold must be a finite number of at least 1, got {}",
				threshold
			));
		}
		Ok(Options {
			size_a: overrides.size_a.or(self.size_a).unwrap_or(defaults.size_a),
			size_b: overrides.size_b.or(self.size_b).unwrap_or(defaults.size_b),
			both_absent_default: self
				.both_absent_default
				.unwrap_or(defaults.both_absent_default),
			threshold,
		})
	}

	pub fn policy(&self) -> NamePolicy {
		NamePolicy::new(
			self.ignored_fields.iter().cloned(),
			self.unused_nodes.iter().cloned(),
		)
	}
}

pub fn load_config(config_path: Option<&Path>) -> Result<Option<Config>> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(Some(config))
	} else {
		Ok(None)
	}
}

#[test]
fn test_parse_config() {
	let config: Config = serde_yaml::from_str(
		"
size_a: 120
size_b: 340
both_absent_default: size_b
ignored_fields: [id]
",
	)
	.unwrap();
	let options = config.options(&Overrides::default()).unwrap();
	assert_eq!(
		options,
		Options {
			size_a: 120,
			size_b: 340,
			both_absent_default: BothAbsentDefault::SizeB,
			threshold: 1.0,
		}
	);
	assert!(config.unused_nodes.is_empty());
	assert!(serde_yaml::from_str::<Config>("size_c: 1").is_err());
}

#[test]
fn test_overrides() {
	let config = Config {
		size_a: Some(10),
		threshold: Some(2.0),
		..Config::default()
	};
	let options = config
		.options(&Overrides {
			size_a: Some(20),
			size_b: Some(30),
			threshold: None,
		})
		.unwrap();
	assert_eq!(options.size_a, 20);
	assert_eq!(options.size_b, 30);
	assert_eq!(options.threshold, 2.0);
	assert_eq!(options.both_absent_default, BothAbsentDefault::SizeA);
	let overrides = Overrides {
		threshold: Some(0.5),
		..Overrides::default()
	};
	assert!(config.options(&overrides).is_err());
}
