//! In-process collaborator for the gRPC adapter tests.
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Code, Request, Response, Status, transport::Server};

use crate::adapters::grpc::{
    channel::RpcChannelFactory,
    proto::{
        AaaVerifyRequest, AaaVerifyResponse, CloudApiBack, CloudApiCall, TokenBack, TokenCall,
        v1::{
            aaa_service_server::{AaaService, AaaServiceServer},
            cloud_execution_service_server::{CloudExecutionService, CloudExecutionServiceServer},
            token_service_server::{TokenService, TokenServiceServer},
        },
    },
};

/// A canned answer: a message or a status to fail with.
pub type Reply<T> = Result<T, (Code, &'static str)>;

fn answer<T: Clone>(reply: &Reply<T>) -> Result<Response<T>, Status> {
    match reply {
        Ok(message) => Ok(Response::new(message.clone())),
        Err((code, message)) => Err(Status::new(*code, *message)),
    }
}

/// Serves every collaborator RPC from scripted replies and records requests.
pub struct ScriptedBackend {
    pub verify: Reply<AaaVerifyResponse>,
    pub set: Reply<TokenBack>,
    pub get: Reply<TokenBack>,
    pub execute: Reply<CloudApiBack>,
    pub(crate) aaa_requests: Mutex<Vec<AaaVerifyRequest>>,
    pub(crate) token_requests: Mutex<Vec<TokenCall>>,
    pub(crate) cloud_requests: Mutex<Vec<CloudApiCall>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            verify: Err((Code::Unimplemented, "verify not scripted")),
            set: Err((Code::Unimplemented, "set not scripted")),
            get: Err((Code::Unimplemented, "get not scripted")),
            execute: Err((Code::Unimplemented, "execute not scripted")),
            aaa_requests: Mutex::default(),
            token_requests: Mutex::default(),
            cloud_requests: Mutex::default(),
        }
    }
}

impl ScriptedBackend {
    pub fn aaa_requests(&self) -> Vec<AaaVerifyRequest> {
        self.aaa_requests.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<TokenCall> {
        self.token_requests.lock().unwrap().clone()
    }

    pub fn cloud_requests(&self) -> Vec<CloudApiCall> {
        self.cloud_requests.lock().unwrap().clone()
    }
}

#[tonic::async_trait]
impl AaaService for ScriptedBackend {
    async fn verify(
        &self,
        request: Request<AaaVerifyRequest>,
    ) -> Result<Response<AaaVerifyResponse>, Status> {
        self.aaa_requests.lock().unwrap().push(request.into_inner());
        answer(&self.verify)
    }
}

#[tonic::async_trait]
impl TokenService for ScriptedBackend {
    async fn set(&self, request: Request<TokenCall>) -> Result<Response<TokenBack>, Status> {
        self.token_requests.lock().unwrap().push(request.into_inner());
        answer(&self.set)
    }

    async fn get(&self, request: Request<TokenCall>) -> Result<Response<TokenBack>, Status> {
        self.token_requests.lock().unwrap().push(request.into_inner());
        answer(&self.get)
    }
}

#[tonic::async_trait]
impl CloudExecutionService for ScriptedBackend {
    async fn execute(
        &self,
        request: Request<CloudApiCall>,
    ) -> Result<Response<CloudApiBack>, Status> {
        self.cloud_requests.lock().unwrap().push(request.into_inner());
        answer(&self.execute)
    }
}

/// A running [`ScriptedBackend`] on a loopback port; stops when dropped.
pub struct TestServer {
    addr: SocketAddr,
    backend: Arc<ScriptedBackend>,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub async fn start(backend: ScriptedBackend) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let backend = Arc::new(backend);
        let (shutdown, stopped) = oneshot::channel::<()>();

        let services = backend.clone();
        tokio::spawn(async move {
            Server::builder()
                .add_service(AaaServiceServer::from_arc(services.clone()))
                .add_service(TokenServiceServer::from_arc(services.clone()))
                .add_service(CloudExecutionServiceServer::from_arc(services))
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            backend,
            _shutdown: shutdown,
        }
    }

    pub fn channels(&self) -> RpcChannelFactory {
        RpcChannelFactory::new(
            format!("http://{}", self.addr),
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    pub fn backend(&self) -> &ScriptedBackend {
        &self.backend
    }
}
