use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::client::AnalysisClient;
use crate::config::ENV;
use crate::controller::UploadController;
use crate::model::FileRef;
use crate::view::WidgetView;

#[derive(Debug, Parser)]
#[command(name = "printqa")]
#[command(
    about = "Faça o upload de um modelo 3D (.stl, .obj) para receber um relatório de problemas comuns de impressão.",
    long_about = None
)]
pub struct Cli {
    /// Mesh file to analyze (.stl or .obj)
    pub file: PathBuf,

    /// Analysis endpoint (defaults to ANALYZE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Print the raw analysis result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `--url` if given, else the configured endpoint. The environment is only
    /// read when the flag is absent.
    pub fn endpoint(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => ENV.analyze_url.clone(),
        }
    }
}

pub async fn read_file(path: &Path) -> anyhow::Result<FileRef> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    log::debug!("read {} ({} bytes)", name, content.len());

    Ok(FileRef::new(name, content))
}

/// Selects `file`, submits it and writes the outcome.
///
/// The report (or the raw result with `json`) goes to `out`, the error
/// message to `err`. Returns `false` when the attempt ended in an error.
pub async fn run<C, O, E>(
    controller: &mut UploadController<C>,
    file: FileRef,
    json: bool,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<bool>
where
    C: AnalysisClient,
    O: Write,
    E: Write,
{
    controller.select_file(Some(file));
    if controller.can_submit() {
        log::info!("analyzing via {}", controller.endpoint());
        controller.submit().await;
    }

    let view = WidgetView::from(&*controller);
    if let Some(message) = view.error {
        writeln!(err, "{}", message)?;
        return Ok(false);
    }

    match (json, controller.result(), view.report) {
        (true, Some(result), _) => writeln!(out, "{}", serde_json::to_string_pretty(result)?)?,
        (false, _, Some(report)) => write!(out, "{}", report)?,
        _ => {}
    }

    Ok(true)
}
