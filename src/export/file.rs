use super::{ExportArtifact, ExportSink};
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Writes exported characters into a local directory.
pub struct FileExportSink {
    export_dir: PathBuf,
}

impl FileExportSink {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String> {
        tokio::fs::create_dir_all(&self.export_dir).await?;

        let path = self.export_dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.contents).await?;
        info!(
            "Exported {} ({} bytes) to {}",
            artifact.filename,
            artifact.contents.len(),
            path.display()
        );

        Ok(path.display().to_string())
    }
}
