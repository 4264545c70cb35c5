// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker adapter: durable queue declare/publish/consume with manual acks.

use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::{FieldTable, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use shunt_core::QueueConfig;
use thiserror::Error;

/// Errors from broker operations
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to establish connection with the broker: {0}")]
    Connect(String),

    #[error("failed to declare queue '{queue}': {reason}")]
    Declare { queue: String, reason: String },

    #[error("failed to set consumer prefetch: {0}")]
    Qos(String),

    #[error("failed to start consumer on '{queue}': {reason}")]
    Consume { queue: String, reason: String },

    #[error("failed to publish to queue '{queue}': {reason}")]
    Publish { queue: String, reason: String },

    #[error("failed to ack delivery: {0}")]
    Ack(String),
}

/// One undelivered message.
#[async_trait]
pub trait Delivery: Send {
    fn body(&self) -> &[u8];

    /// Acknowledge the message. Unacked messages are redelivered after a
    /// crash, so callers ack only once the outcome is committed.
    async fn ack(self) -> Result<(), BrokerError>;
}

/// A manual-ack consumer on one queue.
#[async_trait]
pub trait JobConsumer: Send {
    type Delivery: Delivery;

    /// Next delivery, or `None` once the consumer stream ends.
    async fn next(&mut self) -> Option<Result<Self::Delivery, BrokerError>>;
}

/// Adapter for one broker channel.
///
/// Intake and the router each hold their own instance; nothing is shared
/// between the two, so neither needs locking.
#[async_trait]
pub trait BrokerAdapter: Send + Sync + 'static {
    type Consumer: JobConsumer;

    async fn declare_queue(&self, queue: &QueueConfig) -> Result<(), BrokerError>;

    /// Start consuming with the given prefetch limit.
    async fn consume(
        &self,
        queue: &QueueConfig,
        prefetch: u16,
    ) -> Result<Self::Consumer, BrokerError>;

    /// Publish a persistent `text/plain` message to a queue on the default
    /// exchange (routing key = queue name).
    async fn publish(&self, queue: &str, body: Vec<u8>) -> Result<(), BrokerError>;
}

/// Production broker adapter over one AMQP connection + channel.
pub struct AmqpBroker {
    // The connection must outlive the channel; dropping it closes both.
    _connection: Connection,
    channel: Channel,
}

impl AmqpBroker {
    /// Open a dedicated connection and channel.
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|err| BrokerError::Connect(err.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|err| BrokerError::Connect(err.to_string()))?;
        Ok(Self { _connection: connection, channel })
    }
}

#[async_trait]
impl BrokerAdapter for AmqpBroker {
    type Consumer = AmqpConsumer;

    async fn declare_queue(&self, queue: &QueueConfig) -> Result<(), BrokerError> {
        let options = QueueDeclareOptions {
            durable: queue.durable,
            auto_delete: queue.delete_when_unused,
            exclusive: queue.exclusive,
            nowait: queue.no_wait,
            ..QueueDeclareOptions::default()
        };
        self.channel
            .queue_declare(&queue.name, options, FieldTable::default())
            .await
            .map_err(|err| BrokerError::Declare {
                queue: queue.name.clone(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    async fn consume(
        &self,
        queue: &QueueConfig,
        prefetch: u16,
    ) -> Result<Self::Consumer, BrokerError> {
        self.channel
            .basic_qos(prefetch, BasicQosOptions::default())
            .await
            .map_err(|err| BrokerError::Qos(err.to_string()))?;

        let options = BasicConsumeOptions {
            no_local: queue.no_local,
            no_ack: queue.auto_ack,
            exclusive: queue.exclusive,
            nowait: queue.no_wait,
        };
        let inner = self
            .channel
            .basic_consume(&queue.name, "", options, FieldTable::default())
            .await
            .map_err(|err| BrokerError::Consume {
                queue: queue.name.clone(),
                reason: err.to_string(),
            })?;
        Ok(AmqpConsumer { queue: queue.name.clone(), inner })
    }

    async fn publish(&self, queue: &str, body: Vec<u8>) -> Result<(), BrokerError> {
        let properties = BasicProperties::default()
            .with_delivery_mode(2) // persistent
            .with_content_type(ShortString::from("text/plain"));
        let publish_err = |err: lapin::Error| BrokerError::Publish {
            queue: queue.to_string(),
            reason: err.to_string(),
        };
        self.channel
            .basic_publish("", queue, BasicPublishOptions::default(), &body, properties)
            .await
            .map_err(publish_err)?
            .await
            .map_err(publish_err)?;
        Ok(())
    }
}

/// Consumer stream over a lapin channel.
pub struct AmqpConsumer {
    queue: String,
    inner: lapin::Consumer,
}

#[async_trait]
impl JobConsumer for AmqpConsumer {
    type Delivery = AmqpDelivery;

    async fn next(&mut self) -> Option<Result<Self::Delivery, BrokerError>> {
        let delivery = self.inner.next().await?;
        Some(delivery.map(|inner| AmqpDelivery { inner }).map_err(|err| {
            BrokerError::Consume { queue: self.queue.clone(), reason: err.to_string() }
        }))
    }
}

pub struct AmqpDelivery {
    inner: lapin::message::Delivery,
}

#[async_trait]
impl Delivery for AmqpDelivery {
    fn body(&self) -> &[u8] {
        &self.inner.data
    }

    async fn ack(self) -> Result<(), BrokerError> {
        self.inner
            .ack(BasicAckOptions::default())
            .await
            .map_err(|err| BrokerError::Ack(err.to_string()))
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BrokerAdapter, BrokerError, Delivery, JobConsumer};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shunt_core::QueueConfig;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeBrokerState {
        declared: Vec<String>,
        published: Vec<(String, Vec<u8>)>,
        deliveries: VecDeque<Vec<u8>>,
        acked: usize,
        prefetch: Option<u16>,
        fail_publish: bool,
        fail_declare: bool,
    }

    /// Fake broker for testing: records declares and publishes, serves
    /// scripted deliveries, counts acks.
    #[derive(Clone, Default)]
    pub struct FakeBroker {
        inner: Arc<Mutex<FakeBrokerState>>,
    }

    impl FakeBroker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a message body for the consumer to deliver.
        pub fn push_delivery(&self, body: Vec<u8>) {
            self.inner.lock().deliveries.push_back(body);
        }

        /// Make every subsequent publish fail.
        pub fn fail_publishes(&self) {
            self.inner.lock().fail_publish = true;
        }

        /// Make every subsequent queue declaration fail.
        pub fn fail_declares(&self) {
            self.inner.lock().fail_declare = true;
        }

        pub fn declared_queues(&self) -> Vec<String> {
            self.inner.lock().declared.clone()
        }

        /// `(queue, body)` pairs in publish order.
        pub fn published(&self) -> Vec<(String, Vec<u8>)> {
            self.inner.lock().published.clone()
        }

        pub fn acked(&self) -> usize {
            self.inner.lock().acked
        }

        pub fn prefetch(&self) -> Option<u16> {
            self.inner.lock().prefetch
        }
    }

    #[async_trait]
    impl BrokerAdapter for FakeBroker {
        type Consumer = FakeConsumer;

        async fn declare_queue(&self, queue: &QueueConfig) -> Result<(), BrokerError> {
            let mut state = self.inner.lock();
            if state.fail_declare {
                return Err(BrokerError::Declare {
                    queue: queue.name.clone(),
                    reason: "declare refused".to_string(),
                });
            }
            state.declared.push(queue.name.clone());
            Ok(())
        }

        async fn consume(
            &self,
            _queue: &QueueConfig,
            prefetch: u16,
        ) -> Result<Self::Consumer, BrokerError> {
            self.inner.lock().prefetch = Some(prefetch);
            Ok(FakeConsumer { inner: self.inner.clone() })
        }

        async fn publish(&self, queue: &str, body: Vec<u8>) -> Result<(), BrokerError> {
            let mut state = self.inner.lock();
            if state.fail_publish {
                return Err(BrokerError::Publish {
                    queue: queue.to_string(),
                    reason: "publish refused".to_string(),
                });
            }
            state.published.push((queue.to_string(), body));
            Ok(())
        }
    }

    /// Pops scripted deliveries; the stream ends when they run out.
    pub struct FakeConsumer {
        inner: Arc<Mutex<FakeBrokerState>>,
    }

    #[async_trait]
    impl JobConsumer for FakeConsumer {
        type Delivery = FakeDelivery;

        async fn next(&mut self) -> Option<Result<Self::Delivery, BrokerError>> {
            let body = self.inner.lock().deliveries.pop_front()?;
            Some(Ok(FakeDelivery { body, inner: self.inner.clone() }))
        }
    }

    pub struct FakeDelivery {
        body: Vec<u8>,
        inner: Arc<Mutex<FakeBrokerState>>,
    }

    #[async_trait]
    impl Delivery for FakeDelivery {
        fn body(&self) -> &[u8] {
            &self.body
        }

        async fn ack(self) -> Result<(), BrokerError> {
            self.inner.lock().acked += 1;
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBroker, FakeConsumer, FakeDelivery};
