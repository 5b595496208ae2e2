use std::sync::Arc;

use domain::event::entity::RawMetagameEvent;
use ports::secondary::metrics_port::MetricsPort;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Reads newline-delimited JSON event payloads from an async byte stream.
///
/// Stands in for the upstream push subscription at the process boundary:
/// one raw event object per line, forwarded to a bounded channel. Lines
/// that fail to decode are dropped and counted. Sends block when the
/// channel is full instead of dropping events.
pub struct JsonFeed<R> {
    reader: R,
    metrics: Arc<dyn MetricsPort>,
}

impl<R> JsonFeed<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R, metrics: Arc<dyn MetricsPort>) -> Self {
        Self { reader, metrics }
    }

    /// Run the feed loop, sending decoded events to `tx`.
    ///
    /// Exits on end of input, on a read error, when the receiving side
    /// closes, or when `cancel_token` fires.
    pub async fn run(self, tx: mpsc::Sender<RawMetagameEvent>, cancel_token: CancellationToken) {
        let mut lines = BufReader::new(self.reader).lines();
        let mut forwarded: u64 = 0;
        let mut dropped: u64 = 0;

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!("feed cancelled");
                    break;
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<RawMetagameEvent>(trimmed) {
                            Ok(raw) => {
                                if tx.send(raw).await.is_err() {
                                    debug!("event channel closed, stopping feed");
                                    break;
                                }
                                forwarded += 1;
                            }
                            Err(e) => {
                                dropped += 1;
                                self.metrics.record_event_dropped("decode");
                                warn!(error = %e, "dropping undecodable feed line");
                            }
                        }
                    }
                    Ok(None) => {
                        debug!("feed reached end of input");
                        break;
                    }
                    Err(e) => {
                        error!("feed read error: {e}");
                        break;
                    }
                },
            }
        }

        info!(
            total_events = forwarded,
            dropped_lines = dropped,
            "json feed stopped"
        );
    }
}
