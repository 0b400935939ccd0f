//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod memory;
pub mod notifier;
pub mod postgres;

pub use memory::InMemoryAuthRepository;
pub use notifier::{DeliveryChannel, HttpNotifier, LogNotifier};
pub use postgres::PgAuthRepository;
