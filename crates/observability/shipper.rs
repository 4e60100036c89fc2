use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Level, warn};

const QUEUE_CAPACITY: usize = 1024;
const MAX_BATCH: usize = 100;

#[derive(Clone, Debug)]
pub(crate) struct LogRecord {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) target: String,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
}

#[async_trait]
pub(crate) trait LogSink: Send + Sync {
    async fn push(&self, batch: &[LogRecord]) -> Result<()>;
    fn sink_name(&self) -> &'static str;
}

/// Hands records to a background task that batches them into the sink.
/// Records are dropped instead of blocking when the queue is full.
#[derive(Clone)]
pub(crate) struct LogShipper {
    tx: mpsc::Sender<LogRecord>,
}

impl LogShipper {
    pub(crate) fn new(sink: Arc<dyn LogSink>) -> Self {
        let (tx, mut rx) = mpsc::channel::<LogRecord>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut batch = vec![first];
                while batch.len() < MAX_BATCH {
                    match rx.try_recv() {
                        Ok(record) => batch.push(record),
                        Err(_) => break,
                    }
                }

                if let Err(error) = sink.push(&batch).await {
                    warn!(
                        sink = sink.sink_name(),
                        error = %error,
                        dropped = batch.len(),
                        "Log sink push failed"
                    );
                }
            }
        });

        Self { tx }
    }

    pub(crate) fn try_ship(&self, record: LogRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Log shipping queue full; dropping record");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Log shipping queue closed; dropping record");
            }
        }
    }
}
