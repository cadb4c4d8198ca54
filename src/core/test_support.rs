//! In-memory port implementations shared by the unit tests.
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    core::model::{CallDescriptor, CallResult, CloudCredential},
    ports::{
        AaaError, AaaVerifier, CloudExecutor, DocumentError, DocumentSource, FaultReporter,
        RpcError, RpcResult, TokenRegistration, TokenStore,
    },
};

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl FaultReporter for RecordingReporter {
    fn capture_error(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{context}: {error}"));
    }

    fn capture_message(&self, context: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{context}: {message}"));
    }
}

enum AaaBehavior {
    Accept(String, String),
    Unreachable,
    Reject,
}

pub struct FakeAaa {
    behavior: AaaBehavior,
    calls: Arc<AtomicUsize>,
}

impl FakeAaa {
    fn with_behavior(behavior: AaaBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::default(),
        }
    }

    pub fn accepting(id: &str, signature: &str) -> Self {
        Self::with_behavior(AaaBehavior::Accept(id.to_string(), signature.to_string()))
    }

    pub fn unreachable() -> Self {
        Self::with_behavior(AaaBehavior::Unreachable)
    }

    /// Answers every request with an explicit rejection status.
    pub fn rejecting() -> Self {
        Self::with_behavior(AaaBehavior::Reject)
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl AaaVerifier for FakeAaa {
    async fn verify(&self, id: &str, signature: &str) -> Result<bool, AaaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            AaaBehavior::Accept(good_id, good_sig) => Ok(good_id == id && good_sig == signature),
            AaaBehavior::Unreachable => Err(AaaError::Rpc(RpcError::Connection(
                "aaa unreachable".to_string(),
            ))),
            AaaBehavior::Reject => Err(AaaError::Rejected("signature mismatch".to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeTokenStore {
    entries: Mutex<HashMap<(String, String, String), CloudCredential>>,
    failing: bool,
    rejecting: bool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl FakeTokenStore {
    pub fn with_entry(
        self,
        caller: &str,
        provider: &str,
        name: &str,
        credential: CloudCredential,
    ) -> Self {
        self.entries.lock().unwrap().insert(
            (caller.to_string(), provider.to_string(), name.to_string()),
            credential,
        );
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            rejecting: true,
            ..Self::default()
        }
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for FakeTokenStore {
    async fn set(&self, registration: &TokenRegistration) -> RpcResult<String> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RpcError::Connection("token store down".to_string()));
        }
        if self.rejecting {
            return Ok(String::new());
        }
        self.entries.lock().unwrap().insert(
            (
                registration.caller_id.clone(),
                registration.provider.clone(),
                registration.name.clone(),
            ),
            registration.credential.clone(),
        );
        Ok(format!("token-{}", registration.name))
    }

    async fn get(
        &self,
        caller_id: &str,
        provider: &str,
        name: &str,
    ) -> RpcResult<CloudCredential> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RpcError::Connection("token store down".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(caller_id.to_string(), provider.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

pub enum ExecutorBehavior {
    Respond(Box<dyn Fn(&CallDescriptor) -> CallResult + Send + Sync>),
    Fail(RpcError),
    Panic,
    Hang,
}

pub struct FakeExecutor {
    behavior: ExecutorBehavior,
    calls: Mutex<Vec<CallDescriptor>>,
}

impl FakeExecutor {
    pub fn new(behavior: ExecutorBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(result: CallResult) -> Self {
        Self::new(ExecutorBehavior::Respond(Box::new(move |_| result.clone())))
    }

    pub fn calls(&self) -> Vec<CallDescriptor> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudExecutor for FakeExecutor {
    async fn execute(&self, call: &CallDescriptor) -> RpcResult<CallResult> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.behavior {
            ExecutorBehavior::Respond(f) => Ok(f(call)),
            ExecutorBehavior::Fail(e) => Err(e.clone()),
            ExecutorBehavior::Panic => panic!("executor exploded"),
            ExecutorBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(CallResult::success("late"))
            }
        }
    }
}

pub struct StaticDocument {
    document: Mutex<Result<serde_json::Value, String>>,
    loads: AtomicUsize,
    watch_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl StaticDocument {
    pub fn new(document: serde_json::Value) -> Self {
        Self {
            document: Mutex::new(Ok(document)),
            loads: AtomicUsize::new(0),
            watch_rx: Mutex::new(None),
        }
    }

    pub fn missing() -> Self {
        Self {
            document: Mutex::new(Err("no such file".to_string())),
            loads: AtomicUsize::new(0),
            watch_rx: Mutex::new(None),
        }
    }

    /// Attach a change channel; the returned sender simulates file events.
    pub fn watched(self) -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel(1);
        *self.watch_rx.lock().unwrap() = Some(rx);
        (self, tx)
    }

    pub fn replace(&self, document: serde_json::Value) {
        *self.document.lock().unwrap() = Ok(document);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for StaticDocument {
    async fn load(&self) -> Result<serde_json::Value, DocumentError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.document
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| DocumentError::Io {
                path: "static".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            })
    }

    fn watch(&self) -> Option<mpsc::Receiver<()>> {
        self.watch_rx.lock().unwrap().take()
    }

    fn describe(&self) -> String {
        "static document".to_string()
    }
}
