// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Mail transport seam.
//!
//! The pipeline depends only on [`MailTransport`]; the actual delivery
//! service is an external collaborator. [`LogTransport`] is the
//! in-tree implementation for local runs: it logs the dispatch and
//! returns a locally generated id. Deployments wire a real regional
//! mail client behind the same trait.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Mail transport failure shapes.
///
/// All variants surface to the client as the same generic transport
/// failure; the distinction only matters for internal logs.
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("mail sender address is not configured")]
    NotConfigured,

    #[error("mail transport rejected the message: {0}")]
    Send(String),

    #[error("mail transport returned no message id")]
    MissingMessageId,
}

/// A fully assembled outbound email.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// Configured sender address
    pub sender: String,
    /// Recipient; for contact submissions this equals the sender
    pub recipient: String,
    /// Submitter's address, so replies go back to them
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Capability to dispatch one email, returning a delivery identifier.
///
/// No internal retry: a failure is terminal for the request and the
/// client is expected to retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_mail(&self, message: &OutboundEmail) -> Result<String, TransportError>;
}

/// Transport that logs instead of delivering.
pub struct LogTransport {
    region: String,
}

impl LogTransport {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl MailTransport for LogTransport {
    async fn send_mail(&self, message: &OutboundEmail) -> Result<String, TransportError> {
        let message_id = format!("local-{}", chrono::Utc::now().timestamp_millis());
        info!(
            region = %self.region,
            to = %message.recipient,
            reply_to = %message.reply_to,
            subject = %message.subject,
            message_id = %message_id,
            "dispatching contact email"
        );
        Ok(message_id)
    }
}
