use super::{ExportArtifact, ExportSink};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Collects delivered artifacts in memory.
#[derive(Clone, Default)]
pub struct MockExportSink {
    delivered: Arc<Mutex<Vec<ExportArtifact>>>,
}

impl MockExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_delivered(&self) -> Vec<ExportArtifact> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportSink for MockExportSink {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String> {
        self.delivered.lock().unwrap().push(artifact.clone());
        Ok(format!("mock://{}", artifact.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sink_records_artifacts() {
        let sink = MockExportSink::new();
        let artifact = ExportArtifact {
            filename: "Kuzuha.json".to_string(),
            contents: b"{}".to_vec(),
        };

        let location = sink.deliver(&artifact).await.unwrap();
        assert_eq!(location, "mock://Kuzuha.json");
        assert_eq!(sink.get_delivered(), vec![artifact]);
    }
}
