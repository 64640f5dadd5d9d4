use std::path::PathBuf;

use anyhow::Context as _;

use crate::{report::Report, util::Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OutputArg {
    /// Report format (text or json)
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,
    /// Output file path (stdout if omitted)
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

impl OutputArg {
    pub(crate) fn write_report(&self, report: &Report) -> anyhow::Result<()> {
        let mut output = Output::from_output_path(self.output.as_deref())?;
        match self.format {
            OutputFormat::Json => output.write_json(report)?,
            OutputFormat::Text => {
                report.write_text(&mut output).with_context(|| {
                    format!("Failed to write report to {}", output.display_path())
                })?;
                output.finish()?;
            }
        }
        if let Some(path) = &self.output {
            tracing::info!(path = %path.display(), "report saved");
        }
        Ok(())
    }
}
