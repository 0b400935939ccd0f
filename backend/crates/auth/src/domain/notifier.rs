//! Notifier Trait
//!
//! Outbound delivery of reset codes (email, SMS). Implementations live in
//! the infrastructure layer and are always invoked off the request path.

use thiserror::Error;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, reset_code::ResetCode,
};

/// Everything a delivery channel needs to tell the user their code
#[derive(Debug, Clone)]
pub struct ResetNotice {
    pub to: Email,
    pub name: DisplayName,
    pub code: ResetCode,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery request failed: {0}")]
    Transport(String),

    #[error("Delivery rejected with status {status}")]
    Rejected { status: u16 },
}

#[trait_variant::make(PasswordResetNotifier: Send)]
pub trait LocalPasswordResetNotifier {
    async fn send_password_reset_notice(&self, notice: &ResetNotice) -> Result<(), NotifyError>;
}
