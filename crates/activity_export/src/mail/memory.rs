use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Mailer, OutgoingEmail, Result};

/// Mailer that records messages instead of delivering them.
///
/// Clones share the same outbox.
#[derive(Clone, Debug, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OutgoingEmail>> {
        self.outbox.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of every message sent so far, oldest first.
    pub fn outbox(&self) -> Vec<OutgoingEmail> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every recorded message.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        tracing::debug!(to = ?email.to, subject = %email.subject, "Captured email in memory outbox");
        self.lock().push(email);
        Ok(())
    }
}
