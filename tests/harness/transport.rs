// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Mock mail transport for end-to-end pipeline tests.

use async_trait::async_trait;
use contact_form_relay::mailer::{MailTransport, OutboundEmail, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the mock should do when invoked.
pub enum Behavior {
    /// Return a fresh `mock-N` id
    Succeed,
    /// Raise a send error
    Fail,
    /// Return `Ok` with an empty id
    EmptyId,
}

/// Counting mock transport that records every message it sees.
pub struct MockTransport {
    behavior: Behavior,
    calls: AtomicUsize,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MockTransport {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Number of dispatch attempts, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages the transport was asked to deliver.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send_mail(&self, message: &OutboundEmail) -> Result<String, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent.lock().expect("sent lock").push(message.clone());
        match self.behavior {
            Behavior::Succeed => Ok(format!("mock-{}", call)),
            Behavior::Fail => Err(TransportError::Send("connection refused".to_string())),
            Behavior::EmptyId => Ok(String::new()),
        }
    }
}
