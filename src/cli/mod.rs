//! Command-line interface for groundcheck.
//!
//! Provides commands for scoring a response against context passages,
//! inspecting extracted anchors, and showing the resolved configuration.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::annotate::{Annotator, CommandAnnotator, FixtureAnnotator};
use crate::config::{self, ResolvedConfig};
use crate::core::{AnchorExtractor, GroundingScorer, LimitViolation, ScoringMode};
use crate::domain::{EvaluationReport, Verdict};

/// groundcheck - claim-based grounding verification for generated answers
#[derive(Parser, Debug)]
#[command(name = "groundcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score how well a response is grounded in context passages
    Evaluate {
        #[command(flatten)]
        input: ResponseArgs,

        /// Context JSON: {"context": [...]}, {"chunks": [...]} or a bare array
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Scoring mode (overrides config)
        #[arg(long)]
        mode: Option<ScoringMode>,

        /// N-gram size for ngram mode
        #[arg(long)]
        ngram: Option<usize>,

        #[command(flatten)]
        annotator: AnnotatorArgs,

        /// Also write the report to this file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Exit with status 1 when the verdict is FAIL
        #[arg(long)]
        fail_on_risk: bool,
    },

    /// Print the anchors extracted from a response (debug)
    Anchors {
        #[command(flatten)]
        input: ResponseArgs,

        #[command(flatten)]
        annotator: AnnotatorArgs,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Where the response text comes from (stdin when none given)
#[derive(Args, Debug, Clone, Default)]
pub struct ResponseArgs {
    /// Response text
    #[arg(short, long, conflicts_with_all = ["response_file", "conv"])]
    pub response: Option<String>,

    /// File holding the response text
    #[arg(long, conflicts_with = "conv")]
    pub response_file: Option<PathBuf>,

    /// Conversation JSON with a "response" or "assistant_message" field
    #[arg(long)]
    pub conv: Option<PathBuf>,
}

/// Annotator selection; falls back to the configured one
#[derive(Args, Debug, Clone, Default)]
pub struct AnnotatorArgs {
    /// Fixture file mapping response text to precomputed annotations
    #[arg(long, conflicts_with = "annotator_cmd")]
    pub annotations: Option<PathBuf>,

    /// Annotator command line (reads text on stdin, writes JSON on stdout)
    #[arg(long)]
    pub annotator_cmd: Option<String>,
}

/// Conversation turn as written by chat logs
#[derive(Debug, Deserialize)]
struct Conversation {
    #[serde(alias = "assistant_message")]
    response: Option<String>,
}

/// Report printed by `evaluate`
#[derive(Debug, Serialize)]
struct EvaluationOutput {
    #[serde(flatten)]
    report: EvaluationReport,
    verdict: Verdict,
    mode: ScoringMode,
    annotator: String,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Evaluate {
                input,
                context,
                mode,
                ngram,
                annotator,
                out,
                fail_on_risk,
            } => {
                evaluate(input, context, mode, ngram, annotator, out, fail_on_risk).await
            }
            Commands::Anchors { input, annotator } => show_anchors(input, annotator).await,
            Commands::Config => show_config().await,
        }
    }
}

/// Score a response and print the JSON report
async fn evaluate(
    input: ResponseArgs,
    context_file: Option<PathBuf>,
    mode: Option<ScoringMode>,
    ngram: Option<usize>,
    annotator_args: AnnotatorArgs,
    out: Option<PathBuf>,
    fail_on_risk: bool,
) -> Result<()> {
    let cfg = config::config()?;

    let response = load_response(&input)?;
    let context = match &context_file {
        Some(path) => load_context(path)?,
        None => Vec::new(),
    };
    cfg.limits.validate_input(&response, context.as_slice())?;

    let mut policy = cfg.scoring.clone();
    if let Some(mode) = mode {
        policy.mode = mode;
    }
    if let Some(n) = ngram {
        anyhow::ensure!(n > 0, "--ngram must be at least 1");
        policy.ngram_size = n;
    }
    let threshold = policy.fail_threshold;

    let annotator = select_annotator(&annotator_args, cfg)?;
    let annotator_name = annotator.name().to_string();
    let scorer = GroundingScorer::new(annotator, policy);
    let mode = scorer.policy().mode;

    info!(
        annotator = %annotator_name,
        passages = context.len(),
        "evaluating response"
    );

    let task = tokio::task::spawn_blocking(move || scorer.evaluate(&response, context.as_slice()));
    let report = match tokio::time::timeout(cfg.limits.timeout(), task).await {
        Ok(joined) => joined.context("Evaluation task panicked")??,
        Err(_) => {
            return Err(LimitViolation::Timeout {
                limit_seconds: cfg.limits.timeout_seconds,
            }
            .into())
        }
    };

    let output = EvaluationOutput {
        verdict: report.verdict(threshold),
        report,
        mode,
        annotator: annotator_name,
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    if let Some(path) = out {
        std::fs::write(&path, format!("{}\n", json))
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        eprintln!("Report written to {}", path.display());
    }

    if fail_on_risk && output.verdict == Verdict::Fail {
        eprintln!(
            "Hallucination risk {:.2} exceeds threshold {:.2}",
            output.report.score, threshold
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Print the anchors extracted from a response
async fn show_anchors(input: ResponseArgs, annotator_args: AnnotatorArgs) -> Result<()> {
    let cfg = config::config()?;
    let response = load_response(&input)?;
    cfg.limits.validate_input::<&str>(&response, &[])?;

    let extractor = AnchorExtractor::new(select_annotator(&annotator_args, cfg)?);
    let task = tokio::task::spawn_blocking(move || extractor.extract(&response));
    let anchors = match tokio::time::timeout(cfg.limits.timeout(), task).await {
        Ok(joined) => joined.context("Extraction task panicked")??,
        Err(_) => {
            return Err(LimitViolation::Timeout {
                limit_seconds: cfg.limits.timeout_seconds,
            }
            .into())
        }
    };

    println!("{}", serde_json::to_string_pretty(&anchors)?);
    Ok(())
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("groundcheck configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Annotator:");
    match &cfg.annotator {
        Some(cmd) => println!("  Command: {} {}", cmd.command, cmd.args.join(" ")),
        None => println!("  (built-in rules)"),
    }
    println!();
    println!("Scoring:");
    println!("  Mode:              {:?}", cfg.scoring.mode);
    println!("  N-gram size:       {}", cfg.scoring.ngram_size);
    println!("  Numeric tolerance: {}", cfg.scoring.numeric_tolerance);
    println!("  Claim window:      {} chars", cfg.scoring.claim_window);
    println!("  Fact weight:       {}", cfg.scoring.fact_weight);
    println!("  Claim weight:      {}", cfg.scoring.claim_weight);
    println!("  Drift threshold:   {}", cfg.scoring.drift_threshold);
    println!("  Drift penalty:     {}", cfg.scoring.drift_penalty);
    println!("  Fail threshold:    {}", cfg.scoring.fail_threshold);
    println!();
    println!("Limits:");
    println!("  Timeout:        {}s", cfg.limits.timeout_seconds);
    println!("  Max input size: {} bytes", cfg.limits.max_input_bytes);
    println!("  Max passages:   {}", cfg.limits.max_passages);

    Ok(())
}

/// Pick the annotator: fixture file, then command flag, then config
fn select_annotator(args: &AnnotatorArgs, cfg: &ResolvedConfig) -> Result<Arc<dyn Annotator>> {
    if let Some(path) = &args.annotations {
        return Ok(Arc::new(FixtureAnnotator::from_file(path)?));
    }
    if let Some(line) = &args.annotator_cmd {
        let annotator = CommandAnnotator::from_command_line(line)
            .context("--annotator-cmd must not be empty")?;
        return Ok(Arc::new(annotator));
    }
    Ok(cfg.build_annotator())
}

/// Read the response from the flags, or stdin when piped
fn load_response(input: &ResponseArgs) -> Result<String> {
    if let Some(text) = &input.response {
        return Ok(text.clone());
    }
    if let Some(path) = &input.response_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read response file: {}", path.display()));
    }
    if let Some(path) = &input.conv {
        let content = read_file(path, "conversation")?;
        return parse_conversation(&content)
            .with_context(|| format!("Invalid conversation file: {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No response provided. Use --response, --response-file, --conv or pipe to stdin");
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Load context passages from a JSON file
fn load_context(path: &Path) -> Result<Vec<String>> {
    let content = read_file(path, "context")?;
    parse_context(&content).with_context(|| format!("Invalid context file: {}", path.display()))
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))
}

/// Extract the response text from a conversation turn
fn parse_conversation(json: &str) -> Result<String> {
    let conv: Conversation = serde_json::from_str(json)?;
    conv.response
        .context("expected a \"response\" or \"assistant_message\" field")
}

/// Accepts `{"context": [...]}`, `{"chunks": [...]}`, a bare array, or a
/// single string
fn parse_context(json: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(json)?;
    let passages = match value {
        Value::Object(mut map) => map
            .remove("context")
            .or_else(|| map.remove("chunks"))
            .context("expected a \"context\" or \"chunks\" field")?,
        other => other,
    };

    match passages {
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => anyhow::bail!("context passages must be strings, got {}", other),
            })
            .collect(),
        other => anyhow::bail!("context must be a list of strings, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_context_shapes() {
        assert_eq!(
            parse_context(r#"{"context": ["a", "b"]}"#).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            parse_context(r#"{"chunks": ["c"]}"#).unwrap(),
            vec!["c".to_string()]
        );
        assert_eq!(parse_context(r#"["d"]"#).unwrap(), vec!["d".to_string()]);
        assert_eq!(
            parse_context(r#"{"context": "single"}"#).unwrap(),
            vec!["single".to_string()]
        );
        assert!(parse_context("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_context_rejects_bad_shapes() {
        assert!(parse_context(r#"{"passages": []}"#).is_err());
        assert!(parse_context("[1, 2]").is_err());
        assert!(parse_context("42").is_err());
        assert!(parse_context("not json").is_err());
    }

    #[test]
    fn test_parse_conversation() {
        assert_eq!(
            parse_conversation(r#"{"query": "q", "response": "r"}"#).unwrap(),
            "r"
        );
        assert_eq!(
            parse_conversation(r#"{"user_message": "q", "assistant_message": "a"}"#).unwrap(),
            "a"
        );
        assert!(parse_conversation(r#"{"query": "q"}"#).is_err());
    }

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from([
            "groundcheck",
            "evaluate",
            "--response",
            "The price is $150.",
            "--context",
            "ctx.json",
            "--mode",
            "ngram",
            "--ngram",
            "2",
            "--fail-on-risk",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate {
                input,
                context,
                mode,
                ngram,
                fail_on_risk,
                ..
            } => {
                assert_eq!(input.response.as_deref(), Some("The price is $150."));
                assert_eq!(context, Some(PathBuf::from("ctx.json")));
                assert_eq!(mode, Some(ScoringMode::Ngram));
                assert_eq!(ngram, Some(2));
                assert!(fail_on_risk);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_inputs() {
        let result = Cli::try_parse_from([
            "groundcheck",
            "anchors",
            "--response",
            "x",
            "--conv",
            "conv.json",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "groundcheck",
            "anchors",
            "--response",
            "x",
            "--annotations",
            "a.json",
            "--annotator-cmd",
            "spacy-annotate",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_annotator_selection_prefers_flags() {
        let cfg = config::reload_config().unwrap_or_else(|_| ResolvedConfig {
            scoring: Default::default(),
            annotator: None,
            limits: Default::default(),
            config_file: None,
        });

        let args = AnnotatorArgs {
            annotations: None,
            annotator_cmd: Some("spacy-annotate --fast".into()),
        };
        assert_eq!(select_annotator(&args, &cfg).unwrap().name(), "spacy-annotate");

        let args = AnnotatorArgs {
            annotations: None,
            annotator_cmd: Some("   ".into()),
        };
        assert!(select_annotator(&args, &cfg).is_err());
    }
}
