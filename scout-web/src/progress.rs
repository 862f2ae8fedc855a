use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// `{"type": "logs", "output": ...}` status line for the caller's socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub output: String,
}

impl ProgressMessage {
    pub fn logs(output: impl Into<String>) -> Self {
        Self {
            kind: "logs".to_string(),
            output: output.into(),
        }
    }
}

/// Receives status updates while an offloaded fetch runs.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn send(&self, message: ProgressMessage) -> anyhow::Result<()>;
}

#[async_trait]
impl ProgressSink for mpsc::Sender<ProgressMessage> {
    async fn send(&self, message: ProgressMessage) -> anyhow::Result<()> {
        mpsc::Sender::send(self, message)
            .await
            .map_err(|_| anyhow::anyhow!("progress receiver dropped"))
    }
}

#[async_trait]
impl ProgressSink for mpsc::UnboundedSender<ProgressMessage> {
    async fn send(&self, message: ProgressMessage) -> anyhow::Result<()> {
        mpsc::UnboundedSender::send(self, message)
            .map_err(|_| anyhow::anyhow!("progress receiver dropped"))
    }
}
