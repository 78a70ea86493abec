use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `value` as JSON or YAML, or hand off to `human` for the
    /// plain-text form.
    pub fn render<T, F>(self, value: &T, human: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        Ok(match self {
            OutputFormat::Human => human(value),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }
}
