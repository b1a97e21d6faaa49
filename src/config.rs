//! Configuration for groundcheck.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GROUNDCHECK_ANNOTATOR_CMD, GROUNDCHECK_TIMEOUT_SECONDS, GROUNDCHECK_MODE)
//! 2. Config file (.groundcheck/config.yaml)
//! 3. Defaults (rule-based annotator, built-in scoring policy)
//!
//! Config file discovery:
//! - Searches current directory and parents for .groundcheck/config.yaml
//! - Falls back to ~/.groundcheck/config.yaml
//! - Relative annotator paths are resolved against the project root (the
//!   directory holding .groundcheck/)

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::annotate::{Annotator, CommandAnnotator, RuleAnnotator};
use crate::core::{EvaluationLimits, ScoringMode, ScoringPolicy};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".groundcheck";
const CONFIG_NAME: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scoring: ScoringPolicy,
    #[serde(default)]
    pub annotator: Option<AnnotatorConfig>,
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

/// External annotator command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    pub timeout_seconds: Option<u64>,
    pub max_input_bytes: Option<u64>,
    pub max_passages: Option<usize>,
}

/// Resolved configuration
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Scoring policy handed to the engine
    pub scoring: ScoringPolicy,
    /// External annotator; `None` selects the rule-based annotator
    pub annotator: Option<AnnotatorConfig>,
    /// Request limits
    pub limits: EvaluationLimits,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Build the configured annotator
    pub fn build_annotator(&self) -> Arc<dyn Annotator> {
        match &self.annotator {
            Some(cmd) => Arc::new(CommandAnnotator::new(cmd.command.clone(), cmd.args.clone())),
            None => Arc::new(RuleAnnotator::new()),
        }
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_NAME);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a command path that may be relative to the project root.
/// Bare program names (no separator) are left for PATH lookup.
fn resolve_command(base: &Path, command: &str) -> String {
    let path = PathBuf::from(command);
    if path.is_absolute() || !command.contains(std::path::MAIN_SEPARATOR) {
        command.to_string()
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(command))
            .to_string_lossy()
            .into_owned()
    }
}

/// Merge a parsed config file with environment overrides
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let (config_file, parsed) = match file {
        Some((path, parsed)) => (Some(path), parsed),
        None => (None, ConfigFile::default()),
    };

    // Project root is the parent of .groundcheck/
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let mut scoring = parsed.scoring;
    if let Some(mode) = env("GROUNDCHECK_MODE") {
        scoring.mode = mode
            .parse::<ScoringMode>()
            .map_err(anyhow::Error::msg)
            .context("Invalid GROUNDCHECK_MODE")?;
    }

    let annotator = if let Some(line) = env("GROUNDCHECK_ANNOTATOR_CMD") {
        // Empty value falls back to the rule-based annotator
        let mut parts = line.split_whitespace().map(str::to_string);
        parts.next().map(|command| AnnotatorConfig {
            command,
            args: parts.collect(),
        })
    } else {
        parsed.annotator.map(|cmd| AnnotatorConfig {
            command: resolve_command(&base_dir, &cmd.command),
            args: cmd.args,
        })
    };

    let defaults = EvaluationLimits::default();
    let file_limits = parsed.limits.unwrap_or_default();
    let timeout_seconds = match env("GROUNDCHECK_TIMEOUT_SECONDS") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid GROUNDCHECK_TIMEOUT_SECONDS: {}", raw))?,
        None => file_limits.timeout_seconds.unwrap_or(defaults.timeout_seconds),
    };
    let limits = EvaluationLimits {
        max_input_bytes: file_limits.max_input_bytes.unwrap_or(defaults.max_input_bytes),
        max_passages: file_limits.max_passages.unwrap_or(defaults.max_passages),
        timeout_seconds,
    };

    Ok(ResolvedConfig {
        scoring,
        annotator,
        limits,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };
    resolve(file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, env_from(&[])).unwrap();
        assert_eq!(config.scoring, ScoringPolicy::default());
        assert!(config.annotator.is_none());
        assert_eq!(config.limits, EvaluationLimits::default());
        assert!(config.config_file.is_none());
        assert_eq!(config.build_annotator().name(), "rules");
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join(CONFIG_NAME);
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
scoring:
  claim_weight: 0.75
  claim_window: 120
annotator:
  command: python3
  args: ["annotate.py", "--model", "en_core_web_md"]
limits:
  timeout_seconds: 5
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version.as_deref(), Some("1"));

        let config = resolve(Some((config_path.clone(), parsed)), env_from(&[])).unwrap();
        assert_eq!(config.scoring.claim_weight, 0.75);
        assert_eq!(config.scoring.claim_window, 120);
        assert_eq!(config.scoring.fact_weight, 1.0);
        assert_eq!(config.limits.timeout_seconds, 5);
        assert_eq!(config.limits.max_passages, 1000);
        let annotator = config.annotator.as_ref().unwrap();
        assert_eq!(annotator.command, "python3");
        assert_eq!(annotator.args.len(), 3);
        assert_eq!(config.config_file, Some(config_path));
        assert_eq!(config.build_annotator().name(), "python3");
    }

    #[test]
    fn test_env_overrides_file() {
        let parsed: ConfigFile = serde_yaml::from_str(
            "annotator:\n  command: python3\nlimits:\n  timeout_seconds: 5\n",
        )
        .unwrap();
        let env = env_from(&[
            ("GROUNDCHECK_ANNOTATOR_CMD", "spacy-annotate --fast"),
            ("GROUNDCHECK_TIMEOUT_SECONDS", "12"),
            ("GROUNDCHECK_MODE", "ngram"),
        ]);

        let config = resolve(Some((PathBuf::from("/p/.groundcheck/config.yaml"), parsed)), env).unwrap();
        assert_eq!(
            config.annotator,
            Some(AnnotatorConfig {
                command: "spacy-annotate".into(),
                args: vec!["--fast".into()],
            })
        );
        assert_eq!(config.limits.timeout_seconds, 12);
        assert_eq!(config.scoring.mode, ScoringMode::Ngram);
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(resolve(None, env_from(&[("GROUNDCHECK_TIMEOUT_SECONDS", "soon")])).is_err());
        assert!(resolve(None, env_from(&[("GROUNDCHECK_MODE", "bleu")])).is_err());
    }

    #[test]
    fn test_resolve_relative_command() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(resolve_command(&base, "python3"), "python3");
        assert_eq!(
            resolve_command(&base, "/usr/local/bin/annotate"),
            "/usr/local/bin/annotate"
        );
        #[cfg(unix)]
        assert_eq!(
            resolve_command(&base, "scripts/annotate.py"),
            "/home/user/project/scripts/annotate.py"
        );
    }
}
