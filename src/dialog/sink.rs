//! Ordered collection of outgoing replies

/// Collects the messages a turn produces, in send order.
///
/// Steps append here; the runtime drains the sink once the turn settles and
/// delivers the batch to the caller in the same order.
#[derive(Debug, Default)]
pub struct ResponseSink {
    messages: Vec<String>,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
