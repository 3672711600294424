use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One-shot messages shown on the next page a session renders.
#[derive(Clone, Default)]
pub struct FlashStore {
    messages: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl FlashStore {
    pub fn push(&self, session: Option<&str>, message: impl Into<String>) {
        let Some(session) = session else {
            return;
        };
        if let Ok(mut messages) = self.messages.lock() {
            messages
                .entry(session.to_string())
                .or_default()
                .push(message.into());
        }
    }

    pub fn take(&self, session: Option<&str>) -> Vec<String> {
        let Some(session) = session else {
            return Vec::new();
        };
        match self.messages.lock() {
            Ok(mut messages) => messages.remove(session).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Drops whatever is still queued for a session that is going away.
    pub fn clear(&self, session: Option<&str>) {
        if let (Some(session), Ok(mut messages)) = (session, self.messages.lock()) {
            messages.remove(session);
        }
    }
}
