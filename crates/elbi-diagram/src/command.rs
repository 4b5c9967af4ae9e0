//! Diagram backend that shells out to the mermaid CLI (`mmdc`).

use async_trait::async_trait;
use serde_json::json;
use tokio::process::Command;
use tracing::debug;

use elbi_core::config::DiagramSettings;
use elbi_core::error::{Error, Result};
use elbi_core::traits::DiagramBackend;
use elbi_core::types::BackendResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBackend {
    program: String,
    /// Arguments placed before the render flags, e.g. `-y @mermaid-js/mermaid-cli`
    /// when `program` is `npx`.
    leading_args: Vec<String>,
    theme: String,
    security_level: String,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            theme: "default".to_string(),
            security_level: "loose".to_string(),
        }
    }

    pub fn from_settings(settings: &DiagramSettings) -> Self {
        Self {
            program: settings.command.clone(),
            leading_args: settings.args.clone(),
            theme: settings.theme.clone(),
            security_level: settings.security_level.clone(),
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn mermaid_config(&self) -> serde_json::Value {
        json!({
            "startOnLoad": true,
            "securityLevel": self.security_level,
            "logLevel": "fatal",
            "theme": self.theme,
        })
    }
}

#[async_trait]
impl DiagramBackend for CommandBackend {
    async fn render(&self, svg_id: &str, source: &str) -> Result<BackendResponse> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("diagram.mmd");
        let output = workdir.path().join("diagram.svg");
        let config = workdir.path().join("mermaid.json");
        tokio::fs::write(&input, source).await?;
        tokio::fs::write(&config, self.mermaid_config().to_string()).await?;

        debug!(program = %self.program, svg_id, "running diagram command");
        let result = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .arg("--theme")
            .arg(&self.theme)
            .arg("--configFile")
            .arg(&config)
            .arg("--svgId")
            .arg(svg_id)
            .arg("--quiet")
            .output()
            .await
            .map_err(|e| Error::Render(format!("failed to run `{}`: {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(Error::Render(if stderr.is_empty() {
                format!("`{}` exited with {}", self.program, result.status)
            } else {
                stderr
            }));
        }

        let svg = tokio::fs::read_to_string(&output).await?;
        Ok(BackendResponse::Markup(svg))
    }
}
