// Shared in-memory collaborators for the router-level tests
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use cloudgate::{
    adapters::{AppState, router},
    core::{
        CallDescriptor, CallResult, CloudCredential, CloudGateway, GatewayPorts, GatewaySettings,
    },
    ports::{
        AaaError, AaaVerifier, CloudExecutor, DocumentError, DocumentSource, FaultReporter,
        RpcError, RpcResult, TokenRegistration, TokenStore,
    },
};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

pub struct StaticAaa {
    id: String,
    signature: String,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AaaVerifier for StaticAaa {
    async fn verify(&self, id: &str, signature: &str) -> Result<bool, AaaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(id == self.id && signature == self.signature)
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<(String, String, String), CloudCredential>>,
    pub operations: AtomicUsize,
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn set(&self, registration: &TokenRegistration) -> RpcResult<String> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(
            (
                registration.caller_id.clone(),
                registration.provider.clone(),
                registration.name.clone(),
            ),
            registration.credential.clone(),
        );
        Ok(format!("cred-{}", registration.name))
    }

    async fn get(&self, caller_id: &str, provider: &str, name: &str) -> RpcResult<CloudCredential> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(caller_id.to_string(), provider.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_else(CloudCredential::empty))
    }
}

/// Executor answering every call with a fixed outcome and recording it
pub struct ScriptedExecutor {
    outcome: Result<CallResult, RpcError>,
    calls: Mutex<Vec<CallDescriptor>>,
}

impl ScriptedExecutor {
    pub fn calls(&self) -> Vec<CallDescriptor> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudExecutor for ScriptedExecutor {
    async fn execute(&self, call: &CallDescriptor) -> RpcResult<CallResult> {
        self.calls.lock().unwrap().push(call.clone());
        self.outcome.clone()
    }
}

pub struct JsonDocument(pub Option<serde_json::Value>);

#[async_trait]
impl DocumentSource for JsonDocument {
    async fn load(&self) -> Result<serde_json::Value, DocumentError> {
        self.0.clone().ok_or_else(|| DocumentError::Io {
            path: "memory".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "absent"),
        })
    }

    fn watch(&self) -> Option<mpsc::Receiver<()>> {
        None
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Default)]
pub struct CountingReporter {
    pub faults: AtomicUsize,
}

impl FaultReporter for CountingReporter {
    fn capture_error(&self, _context: &str, _error: &(dyn std::error::Error + 'static)) {
        self.faults.fetch_add(1, Ordering::SeqCst);
    }

    fn capture_message(&self, _context: &str, _message: &str) {
        self.faults.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub router: Router,
    pub aaa: Arc<StaticAaa>,
    pub store: Arc<MemoryTokenStore>,
    pub executor: Arc<ScriptedExecutor>,
    pub reporter: Arc<CountingReporter>,
}

pub struct HarnessBuilder {
    settings: GatewaySettings,
    outcome: Result<CallResult, RpcError>,
    action_map: Arc<dyn DocumentSource>,
    service_catalog: Arc<dyn DocumentSource>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            settings: GatewaySettings {
                open_token: "open-sesame".to_string(),
                ..GatewaySettings::default()
            },
            outcome: Ok(CallResult::success(r#"{"Response":{"TotalCount":0}}"#)),
            action_map: Arc::new(JsonDocument(None)),
            service_catalog: Arc::new(JsonDocument(None)),
        }
    }

    pub fn settings(mut self, edit: impl FnOnce(&mut GatewaySettings)) -> Self {
        edit(&mut self.settings);
        self
    }

    pub fn outcome(mut self, outcome: Result<CallResult, RpcError>) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn action_map(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.action_map = source;
        self
    }

    pub fn service_catalog(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.service_catalog = source;
        self
    }

    pub async fn build(self) -> Harness {
        let aaa = Arc::new(StaticAaa {
            id: "alice".to_string(),
            signature: "valid-sig".to_string(),
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(MemoryTokenStore::default());
        for (provider, account_id) in [("qcloud", "AKID-alice"), ("aws", "AKIA-alice")] {
            store
                .set(&TokenRegistration {
                    provider: provider.to_string(),
                    caller_id: "alice".to_string(),
                    name: "prod".to_string(),
                    credential: CloudCredential::new(account_id, "secret"),
                })
                .await
                .unwrap();
        }
        store.operations.store(0, Ordering::SeqCst);

        let executor = Arc::new(ScriptedExecutor {
            outcome: self.outcome,
            calls: Mutex::new(Vec::new()),
        });
        let reporter = Arc::new(CountingReporter::default());

        let gateway = CloudGateway::new(
            self.settings,
            GatewayPorts {
                aaa: aaa.clone(),
                token_store: store.clone(),
                executor: executor.clone(),
                action_map: self.action_map,
                service_catalog: self.service_catalog,
                reporter: reporter.clone(),
            },
        );

        Harness {
            router: router(AppState::new(Arc::new(gateway), 64 * 1024, "test")),
            aaa,
            store,
            executor,
            reporter,
        }
    }
}

pub struct Reply {
    pub content_type: String,
    pub body: bytes::Bytes,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("body is JSON")
    }
}

impl Harness {
    pub async fn post(&self, uri: &str, content_type: &str, body: serde_json::Value) -> Reply {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200, "envelope codes travel with HTTP 200");
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        Reply { content_type, body }
    }

    pub fn rpc_calls(&self) -> usize {
        self.aaa.calls.load(Ordering::SeqCst)
            + self.store.operations.load(Ordering::SeqCst)
            + self.executor.calls().len()
    }
}

pub fn private_call(signature: &str, name: &str, action: &str) -> serde_json::Value {
    serde_json::json!({
        "token": {"id": "alice", "signature": signature},
        "name": name,
        "region": "ap-guangzhou",
        "action": action,
        "params": {"InstanceIds.0": "ins-1"}
    })
}

pub fn raw_call(token: &str, cloud_id: &str) -> serde_json::Value {
    serde_json::json!({
        "token": token,
        "cloudid": cloud_id,
        "cloudkey": "raw-secret",
        "region": "us-east-1",
        "action": "DescribeRegions",
        "params": {}
    })
}

pub fn registration(signature: &str) -> serde_json::Value {
    serde_json::json!({
        "token": {"id": "alice", "signature": signature},
        "provider": "aliyun",
        "name": "staging",
        "id": "LTAI-alice",
        "key": "aliyun-secret"
    })
}
