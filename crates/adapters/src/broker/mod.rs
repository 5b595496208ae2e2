// Broker adapter: AMQP publisher with confirms
pub mod amqp_publisher;
