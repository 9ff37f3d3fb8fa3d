//! Metric sinks
//!
//! One gauge leaves the monitor per cycle. The sink handle is built once
//! at startup and passed into the cycle driver, so tests can substitute a
//! recording double.

use crate::error::Result;
use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

/// Gauge name pushed to DogStatsD, matching the daemon's dashboard key.
pub const METRIC_NAME: &str = "pagecache_ttl.min_cached_time_seconds";

/// Publishes one named gauge value per cycle. Last value wins; there is
/// no aggregation.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn publish(&self, name: &str, value: u64) -> Result<()>;
}

/// Prints the metric as a single JSON object per line on stdout.
pub struct ConsoleSink;

#[async_trait]
impl MetricSink for ConsoleSink {
    async fn publish(&self, name: &str, value: u64) -> Result<()> {
        let mut object = serde_json::Map::new();
        object.insert(name.to_string(), serde_json::Value::from(value));
        println!("{}", serde_json::Value::Object(object));
        Ok(())
    }
}

/// Pushes the metric as a DogStatsD gauge datagram over UDP.
///
/// The wire format is the plaintext statsd line `<name>:<value>|g`. UDP
/// is fire-and-forget: a daemon that is down costs nothing but the send.
pub struct DogstatsdSink {
    socket: UdpSocket,
}

impl DogstatsdSink {
    pub async fn connect(addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(addr).await?;
        Ok(Self { socket })
    }
}

#[async_trait]
impl MetricSink for DogstatsdSink {
    async fn publish(&self, name: &str, value: u64) -> Result<()> {
        let datagram = format!("{}:{}|g", name, value);
        self.socket.send(datagram.as_bytes()).await?;
        debug!(metric = name, value, "Delivered gauge to DogStatsD");
        Ok(())
    }
}
