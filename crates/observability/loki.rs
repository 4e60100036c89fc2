use super::config::{LokiConfig, ServiceContext};
use super::shipper::{LogRecord, LogSink};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

/// Pushes batches to Grafana Loki's HTTP push API with basic auth.
pub(crate) struct LokiPushSink {
    push_url: Url,
    username: String,
    password: String,
    service_context: ServiceContext,
    client: Client,
}

impl LokiPushSink {
    pub(crate) fn new(config: &LokiConfig, service_context: ServiceContext) -> Result<Self> {
        let push_url = config.host.join("/loki/api/v1/push")?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self {
            push_url,
            username: config.username.clone(),
            password: config.password.clone(),
            service_context,
            client,
        })
    }
}

#[async_trait]
impl LogSink for LokiPushSink {
    async fn push(&self, batch: &[LogRecord]) -> Result<()> {
        let body = push_body(&self.service_context, batch);

        let response = self
            .client
            .post(self.push_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "loki push returned non-success status: {}",
            response.status()
        ))
    }

    fn sink_name(&self) -> &'static str {
        "loki"
    }
}

/// One stream per level so Loki can filter on the `level` label.
pub(crate) fn push_body(context: &ServiceContext, batch: &[LogRecord]) -> Value {
    let mut streams: Vec<(String, Vec<Value>)> = Vec::new();

    for record in batch {
        let level = record.level.as_str().to_ascii_lowercase();
        let timestamp_ns = record
            .timestamp
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string();
        let line = json!({
            "timestamp": record.timestamp.to_rfc3339(),
            "level": level,
            "target": record.target,
            "message": record.message,
            "component": context.component,
            "fields": record.fields,
        })
        .to_string();
        let entry = json!([timestamp_ns, line]);

        match streams.iter_mut().find(|(name, _)| *name == level) {
            Some((_, values)) => values.push(entry),
            None => streams.push((level, vec![entry])),
        }
    }

    let streams = streams
        .into_iter()
        .map(|(level, values)| {
            json!({
                "stream": {
                    "app": context.service_name,
                    "environment": context.environment,
                    "level": level,
                },
                "values": values,
            })
        })
        .collect::<Vec<_>>();

    json!({ "streams": streams })
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("loki push request timed out");
    }
    if error.is_connect() {
        return anyhow!("loki push connection failed");
    }
    anyhow!("loki push request failed")
}
