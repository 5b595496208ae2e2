use std::future::Future;
use std::pin::Pin;

use domain::event::error::PublishError;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions};
use lapin::publisher_confirm::Confirmation;
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use ports::secondary::event_publisher::EventPublisher;
use tracing::info;

/// Exchange every lifecycle message is published to.
pub const EVENTS_EXCHANGE: &str = "events";

/// Routing key consumers bind to for metagame lifecycle messages.
pub const METAGAME_ROUTING_KEY: &str = "metagame";

/// Event publisher backed by an AMQP 0.9.1 broker.
///
/// Declares a durable direct exchange named `events` at connect time.
/// Messages carry persistent delivery mode and are confirmed by the
/// broker; a negative confirmation surfaces as an error to the caller.
pub struct AmqpPublisher {
    /// Keeps the broker connection alive for the channel's lifetime.
    _connection: Connection,
    channel: Channel,
}

impl AmqpPublisher {
    /// Connect to the broker at `url` and declare the `events` exchange.
    ///
    /// Called once at startup; an unreachable broker or rejected
    /// credentials fails here rather than on first publish.
    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| PublishError::Connect(e.to_string()))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        // Broker acknowledges every publish on this channel.
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        channel
            .exchange_declare(
                EVENTS_EXCHANGE,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        info!(exchange = EVENTS_EXCHANGE, "amqp publisher connected");
        Ok(Self {
            _connection: connection,
            channel,
        })
    }
}

impl EventPublisher for AmqpPublisher {
    fn publish<'a>(
        &'a self,
        payload: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>> {
        Box::pin(async move {
            let confirmation = self
                .channel
                .basic_publish(
                    EVENTS_EXCHANGE,
                    METAGAME_ROUTING_KEY,
                    BasicPublishOptions::default(),
                    payload,
                    // Delivery mode 2: broker persists the message to disk.
                    BasicProperties::default()
                        .with_delivery_mode(2)
                        .with_content_type("application/json".into()),
                )
                .await
                .map_err(|e| PublishError::Publish(e.to_string()))?
                .await
                .map_err(|e| PublishError::Publish(e.to_string()))?;

            match confirmation {
                Confirmation::Ack(_) | Confirmation::NotRequested => Ok(()),
                Confirmation::Nack(_) => Err(PublishError::NotConfirmed),
            }
        })
    }
}
