//! Subprocess annotator.
//!
//! Spawns an external program, pipes the text to its stdin and expects one
//! JSON [`Annotation`] on stdout. A minimal spaCy wrapper:
//!
//! ```text
//! import json, sys, spacy
//! nlp = spacy.load("en_core_web_md")
//! doc = nlp(sys.stdin.read())
//! print(json.dumps({
//!     "entities": [{"label": e.label_, "text": e.text, "start": e.start_char, "end": e.end_char} for e in doc.ents],
//!     "tokens": [{"text": t.text, "lemma": t.lemma_, "pos": t.pos_, "dep": t.dep_,
//!                 "head": t.head.i, "children": [c.i for c in t.children], "idx": t.idx} for t in doc],
//! }))
//! ```

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{AnnotateError, Annotation, Annotator};

/// Annotator backed by an external command
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    program: String,
    args: Vec<String>,
}

impl CommandAnnotator {
    /// Create an annotator running `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a shell-like command line (whitespace separated, no quoting)
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// The command line, for messages
    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

impl Annotator for CommandAnnotator {
    fn name(&self) -> &str {
        &self.program
    }

    fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        let command = self.display();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AnnotateError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a chatty child cannot block
        // on a full stdout pipe while we are still writing.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(text.as_bytes())?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output.map_err(|source| AnnotateError::Io {
            command: command.clone(),
            source,
        })?;

        // A failing child usually closes stdin early; report its exit status
        // rather than the broken pipe.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnnotateError::Failed {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        written.map_err(|source| AnnotateError::Io {
            command: command.clone(),
            source,
        })?;

        let annotation: Annotation = serde_json::from_slice(&output.stdout)
            .map_err(|source| AnnotateError::InvalidOutput {
                command: command.clone(),
                source,
            })?;

        debug!(
            annotator = %command,
            tokens = annotation.tokens.len(),
            entities = annotation.entities.len(),
            "annotated text"
        );
        Ok(annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line() {
        let annotator = CommandAnnotator::from_command_line("python3 annotate.py --model md").unwrap();
        assert_eq!(annotator.program, "python3");
        assert_eq!(annotator.args, vec!["annotate.py", "--model", "md"]);
        assert_eq!(annotator.name(), "python3");

        assert!(CommandAnnotator::from_command_line("   ").is_none());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let annotator = CommandAnnotator::new("/nonexistent/groundcheck-annotator", vec![]);
        let err = annotator.annotate("text").unwrap_err();
        assert!(matches!(err, AnnotateError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_json_from_stdout() {
        let annotator = CommandAnnotator::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat > /dev/null; echo '{"entities": [], "tokens": []}'"#.to_string(),
            ],
        );
        let annotation = annotator.annotate("The price is $100.").unwrap();
        assert!(annotation.tokens.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_json_output_is_invalid() {
        let annotator = CommandAnnotator::new(
            "sh",
            vec!["-c".to_string(), "cat > /dev/null; echo nope".to_string()],
        );
        let err = annotator.annotate("x").unwrap_err();
        assert!(matches!(err, AnnotateError::InvalidOutput { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_failure() {
        let annotator = CommandAnnotator::new(
            "sh",
            vec!["-c".to_string(), "cat > /dev/null; echo boom >&2; exit 3".to_string()],
        );
        match annotator.annotate("x").unwrap_err() {
            AnnotateError::Failed { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
