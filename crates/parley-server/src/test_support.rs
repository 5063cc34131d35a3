//! Scripted model client shared by the server tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_core::{Persona, RelayError, Reply};
use parley_engine::Relay;
use parley_llm::ModelClient;

pub struct MockClient {
    result: Result<Reply, RelayError>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_result(Ok(Reply::text(text)))
    }

    pub fn failing(err: RelayError) -> Arc<Self> {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<Reply, RelayError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _persona: &Persona, query: &str) -> Result<Reply, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.result.clone()
    }
}

pub fn relay_with(client: Arc<MockClient>) -> Relay {
    Relay::new(client, Arc::new(Persona::new("Tester", "Be terse.")))
}
