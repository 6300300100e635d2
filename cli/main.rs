//! This module contains the main entrypoint to the vft_likelihood cli.

use self::config::{load_config, Overrides};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use vft_likelihood::{
	Correspondence, DiagnosticSink, LogSink, NameCorrespondence, Node, NoopSink, Recorder,
	TraceEvent, TreeLikelihoodEngine, ValueWeightParser, Verdict,
};

mod config;

#[derive(Parser)]
#[clap(
	about = "Score how well a tree matches one of two reference models.",
	disable_help_subcommand = true
)]
enum Options {
	#[clap(name = "score")]
	Score(Box<ScoreOptions>),
}

#[derive(Parser, Debug)]
#[clap(about = "score a tree")]
#[clap(long_about = "score an observed tree against reference models a and b")]
struct ScoreOptions {
	#[clap(long, help = "the path to the observed tree, in yaml or json")]
	observed: PathBuf,
	#[clap(long, help = "the path to the tree of model a, in yaml or json")]
	model_a: PathBuf,
	#[clap(long, help = "the path to the tree of model b, in yaml or json")]
	model_b: PathBuf,
	#[clap(short, long, help = "the path to a config file")]
	config: Option<PathBuf>,
	#[clap(long, help = "the number of samples model a was built from")]
	size_a: Option<u64>,
	#[clap(long, help = "the number of samples model b was built from")]
	size_b: Option<u64>,
	#[clap(long, help = "the likelihood above which model a wins")]
	threshold: Option<f64>,
	#[clap(short, long, help = "log every visited node and field")]
	verbose: bool,
	#[clap(long, help = "print the trace of every visited node as json")]
	trace: bool,
}

#[derive(Debug, serde::Serialize)]
struct Report {
	likelihood: f64,
	log_likelihood: f64,
	nodes: usize,
	verdict: Verdict,
	#[serde(skip_serializing_if = "Option::is_none")]
	trace: Option<Vec<TraceEvent>>,
}

fn main() {
	let options = Options::parse();
	let result = match options {
		Options::Score(options) => cli_score(*options),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_score(options: ScoreOptions) -> Result<()> {
	init_logger(options.verbose);
	let report = score(&options)?;
	println!("likelihood: {}", report.likelihood);
	println!("log likelihood: {}", report.log_likelihood);
	println!("nodes scored: {}", report.nodes);
	println!("verdict: {}", report.verdict);
	if let Some(trace) = report.trace {
		println!("{}", serde_json::to_string_pretty(&trace)?);
	}
	Ok(())
}

fn score(options: &ScoreOptions) -> Result<Report> {
	let config = load_config(options.config.as_deref())?.unwrap_or_default();
	let engine_options = config.options(&Overrides {
		size_a: options.size_a,
		size_b: options.size_b,
		threshold: options.threshold,
	})?;
	let observed = load_tree(&options.observed)?;
	let model_a = load_tree(&options.model_a)?;
	let model_b = load_tree(&options.model_b)?;
	let policy = config.policy();
	let engine = TreeLikelihoodEngine::new(
		engine_options,
		&NameCorrespondence,
		&policy,
		&ValueWeightParser,
	);
	let mut recorder = Recorder::new();
	let mut log_sink = LogSink;
	let mut noop_sink = NoopSink;
	let sink: &mut dyn DiagnosticSink = if options.trace {
		&mut recorder
	} else if options.verbose {
		&mut log_sink
	} else {
		&mut noop_sink
	};
	let (likelihood, verdict) = engine
		.classify(&observed, Correspondence::both(&model_a, &model_b), sink)
		.with_context(|| format!("failed to score {}", options.observed.display()))?;
	Ok(Report {
		likelihood: likelihood.get(),
		log_likelihood: likelihood.log_likelihood(),
		nodes: likelihood.factors(),
		verdict,
		trace: if options.trace {
			Some(recorder.events)
		} else {
			None
		},
	})
}

/// Trees are read as yaml, which also accepts json.
fn load_tree(path: &Path) -> Result<Node> {
	let tree = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read tree file {}", path.display()))?;
	let tree = serde_yaml::from_str(&tree)
		.with_context(|| format!("failed to parse tree file {}", path.display()))?;
	Ok(tree)
}

fn init_logger(verbose: bool) {
	let level = if verbose { "trace" } else { "info" };
	let env_filter = format!("vft_likelihood={}", level);
	let env = env_logger::Env::default().default_filter_or(env_filter);
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
}

#[cfg(test)]
fn data_path(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[cfg(test)]
fn score_options() -> ScoreOptions {
	ScoreOptions {
		observed: data_path("observed.yaml"),
		model_a: data_path("model_a.yaml"),
		model_b: data_path("model_b.yaml"),
		config: Some(data_path("config.yaml")),
		size_a: None,
		size_b: None,
		threshold: None,
		verbose: false,
		trace: false,
	}
}

#[test]
fn test_score() {
	let report = score(&score_options()).unwrap();
	// header 0.75 and 7, body 3, link 4. The id fields and the signature node are ignored.
	assert!((report.likelihood - 63.0).abs() < 1e-9);
	assert!((report.log_likelihood - 63f64.ln()).abs() < 1e-9);
	assert_eq!(report.nodes, 3);
	assert_eq!(report.verdict, Verdict::ModelA);
	assert!(report.trace.is_none());
}

#[test]
fn test_score_swapped_models() {
	let options = ScoreOptions {
		model_a: data_path("model_b.yaml"),
		model_b: data_path("model_a.yaml"),
		trace: true,
		..score_options()
	};
	let report = score(&options).unwrap();
	assert!((report.likelihood - 1.0 / 63.0).abs() < 1e-4);
	assert_eq!(report.verdict, Verdict::ModelB);
	let trace = report.trace.unwrap();
	let ended = trace
		.iter()
		.filter(|event| matches!(event, TraceEvent::EndNode { .. }))
		.count();
	assert_eq!(ended, 3);
}

#[test]
fn test_missing_tree() {
	let options = ScoreOptions {
		observed: data_path("missing.yaml"),
		..score_options()
	};
	let error = score(&options).unwrap_err();
	assert!(error.to_string().starts_with("failed to read tree file"));
}
