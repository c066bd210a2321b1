//! Blocking invocation of external analysis tools.
//!
//! Each adapter talks to its tool through [`ToolInvoker`]: an optional path
//! appended to the command line, optional text written to stdin, and the
//! captured stdout returned as text. Spawn failures, non-zero exits and
//! undecodable output all surface as [`LyricalError::ExternalTool`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::core::errors::{LyricalError, Result};

/// What to hand an external tool on a single call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolInput<'a> {
    /// Path appended as the final command-line argument
    pub path: Option<&'a Path>,
    /// Text written to the tool's standard input
    pub stdin: Option<&'a str>,
}

impl<'a> ToolInput<'a> {
    /// Pass a document path on the command line
    pub fn path(path: &'a Path) -> Self {
        Self {
            path: Some(path),
            stdin: None,
        }
    }

    /// Feed text on standard input
    pub fn stdin(text: &'a str) -> Self {
        Self {
            path: None,
            stdin: Some(text),
        }
    }
}

/// Capability to run an external tool once and collect its output.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Short tool name used in errors and logs
    fn tool_name(&self) -> &str;

    /// Run the tool to completion and return its standard output
    async fn invoke(&self, input: ToolInput<'_>) -> Result<String>;
}

/// A configured external program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCommand {
    /// Name used in errors and logs
    #[serde(default)]
    pub name: String,

    /// Executable to run (looked up on `PATH` when not a path)
    pub program: String,

    /// Fixed arguments placed before the document path
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Create a new tool command
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append fixed arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Human-readable command line, for logs
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl ToolInvoker for ToolCommand {
    fn tool_name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: ToolInput<'_>) -> Result<String> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(path) = input.path {
            command.arg(path);
        }
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
            .stdin(if input.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Invoking {}: {}", self.name, self.display_command());

        let mut child = command.spawn().map_err(|e| {
            LyricalError::external_tool(
                &self.name,
                format!("failed to start '{}': {}", self.program, e),
            )
        })?;

        // stdin is fed while stdout drains, so neither pipe can fill up and stall.
        let stdin_pipe = child.stdin.take();
        let feed = async move {
            match (stdin_pipe, input.stdin) {
                (Some(mut pipe), Some(text)) => {
                    pipe.write_all(text.as_bytes()).await?;
                    pipe.shutdown().await
                }
                _ => Ok::<(), std::io::Error>(()),
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        match fed {
            // A tool may legitimately exit before consuming all of its input.
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(LyricalError::external_tool(
                    &self.name,
                    format!("failed to write stdin: {e}"),
                ));
            }
            _ => {}
        }
        let output = output.map_err(|e| {
            LyricalError::external_tool(&self.name, format!("failed to collect output: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LyricalError::external_tool_status(
                &self.name,
                format!("exited with {}: {}", output.status, stderr.trim()),
                output.status.code(),
            ));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            LyricalError::external_tool(&self.name, format!("output is not valid UTF-8: {e}"))
        })
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invoke_with_path_argument() {
        let tool = ToolCommand::new("echo", "echo").with_args(["tagged:"]);
        let output = tool
            .invoke(ToolInput::path(Path::new("/tmp/song.txt")))
            .await
            .unwrap();
        assert_eq!(output.trim(), "tagged: /tmp/song.txt");
    }

    #[tokio::test]
    async fn test_invoke_with_stdin() {
        let tool = ToolCommand::new("cat", "cat");
        let output = tool.invoke(ToolInput::stdin("teh cat")).await.unwrap();
        assert_eq!(output, "teh cat");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let tool = ToolCommand::new("failing", "sh").with_args(["-c", "echo oops >&2; exit 3"]);
        let err = tool.invoke(ToolInput::default()).await.unwrap_err();

        match err {
            LyricalError::ExternalTool {
                tool,
                status,
                message,
            } => {
                assert_eq!(tool, "failing");
                assert_eq!(status, Some(3));
                assert!(message.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let tool = ToolCommand::new("ghost", "definitely-not-an-installed-tool-42");
        let err = tool.invoke(ToolInput::default()).await.unwrap_err();
        assert!(matches!(err, LyricalError::ExternalTool { status: None, .. }));
    }

    #[test]
    fn test_display_command() {
        let tool = ToolCommand::new("spelling", "aspell").with_args(["-d", "en", "list"]);
        assert_eq!(tool.display_command(), "aspell -d en list");
    }
}
