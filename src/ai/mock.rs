use super::CompletionService;
use crate::models::CompletionRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// One scripted outcome of a mock completion call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Transport(String),
}

#[derive(Clone)]
pub struct MockCompletionClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        locked(&self.replies).push(MockReply::Text(text.into()));
        self
    }

    pub fn with_transport_error(self, message: impl Into<String>) -> Self {
        locked(&self.replies).push(MockReply::Transport(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        locked(&self.requests).last().cloned()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let count = {
            let mut requests = locked(&self.requests);
            requests.push(request.clone());
            requests.len()
        };

        let replies = locked(&self.replies);
        if replies.is_empty() {
            return Ok("{}".to_string());
        }

        // Cycle through the script
        match &replies[(count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Transport(message) => Err(Error::Transport(message.clone())),
        }
    }
}
