//! Core dispatch pipeline.
//!
//! `CloudGateway` wires the pipeline stages together for the three entry
//! points:
//! * credential registration: field check, optional AAA, token store write
//! * private call: AAA, catalog policy, stored credential, optional action
//!   mapping, dispatch, transcoding
//! * raw call: open token, catalog policy, inline credential, optional
//!   action mapping, dispatch, transcoding (provider-native format)
//!
//! Every stage failure before dispatch is terminal and surfaces as a
//! [`GatewayError`]; dispatch itself never fails and is always transcoded.
use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        action_map::ActionMapper,
        authenticator::{Authenticator, OpenTokenAuthenticator, PrivateTokenAuthenticator},
        catalog::ServiceCatalog,
        credentials::CredentialResolver,
        dispatcher::CallDispatcher,
        documents::CachedDocument,
        error::{ErrorEnvelope, GatewayError, GatewayResult},
        model::{CallDescriptor, CloudCredential},
        request::{CloudApiRawRequest, CloudApiRequest, TokenRegistrationRequest},
        transcoder::{CallMode, Transcoded, transcode},
    },
    ports::{AaaVerifier, CloudExecutor, DocumentSource, FaultReporter, TokenStore},
};

/// Policy knobs of the pipeline, resolved from configuration.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Registration skips AAA verification when disabled
    pub aaa_enabled: bool,
    pub open_token: String,
    pub call_deadline: Duration,
    pub action_map_ttl: Duration,
    pub service_catalog_ttl: Duration,
    pub map_private_calls: bool,
    pub map_raw_calls: bool,
    pub enforce_service_catalog: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            aaa_enabled: true,
            open_token: String::new(),
            call_deadline: Duration::from_secs(30),
            action_map_ttl: Duration::from_secs(30),
            service_catalog_ttl: Duration::from_secs(30),
            map_private_calls: false,
            map_raw_calls: false,
            enforce_service_catalog: false,
        }
    }
}

/// External collaborators the pipeline talks to.
pub struct GatewayPorts {
    pub aaa: Arc<dyn AaaVerifier>,
    pub token_store: Arc<dyn TokenStore>,
    pub executor: Arc<dyn CloudExecutor>,
    pub action_map: Arc<dyn DocumentSource>,
    pub service_catalog: Arc<dyn DocumentSource>,
    pub reporter: Arc<dyn FaultReporter>,
}

pub struct CloudGateway {
    private_auth: PrivateTokenAuthenticator,
    open_auth: OpenTokenAuthenticator,
    credentials: CredentialResolver,
    actions: ActionMapper,
    catalog: ServiceCatalog,
    dispatcher: CallDispatcher,
    settings: GatewaySettings,
    reporter: Arc<dyn FaultReporter>,
}

impl CloudGateway {
    pub fn new(settings: GatewaySettings, ports: GatewayPorts) -> Self {
        let reporter = ports.reporter;
        let action_map = Arc::new(CachedDocument::new(
            ports.action_map,
            settings.action_map_ttl,
            reporter.clone(),
        ));
        let service_catalog = Arc::new(CachedDocument::new(
            ports.service_catalog,
            settings.service_catalog_ttl,
            reporter.clone(),
        ));

        Self {
            private_auth: PrivateTokenAuthenticator::new(ports.aaa, reporter.clone()),
            open_auth: OpenTokenAuthenticator::new(settings.open_token.clone()),
            credentials: CredentialResolver::new(ports.token_store, reporter.clone()),
            actions: ActionMapper::new(action_map),
            catalog: ServiceCatalog::new(service_catalog),
            dispatcher: CallDispatcher::new(
                ports.executor,
                settings.call_deadline,
                reporter.clone(),
            ),
            settings,
            reporter,
        }
    }

    /// Start cache invalidation tasks for every watchable document.
    pub fn spawn_document_watchers(&self) -> Vec<tokio::task::JoinHandle<()>> {
        [self.actions.document(), self.catalog.document()]
            .into_iter()
            .filter_map(|document| document.spawn_invalidation())
            .collect()
    }

    pub fn reporter(&self) -> &Arc<dyn FaultReporter> {
        &self.reporter
    }

    /// The dispatcher, for callers that enumerate paged listings.
    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }

    /// Store a provider credential for the calling user.
    pub async fn register_token(
        &self,
        request: TokenRegistrationRequest,
    ) -> GatewayResult<ErrorEnvelope> {
        request.validate()?;

        if self.settings.aaa_enabled {
            if !self.private_auth.authenticate(&request.token).await {
                return Err(GatewayError::AuthenticationFailed);
            }
        } else {
            tracing::debug!("AAA disabled, registration proceeds unverified");
        }

        let registration = request.into_registration();
        match self.credentials.register(&registration).await {
            Some(_) => Ok(ErrorEnvelope::success()),
            None => Err(GatewayError::BadRequest(
                "credential registration was not accepted".to_string(),
            )),
        }
    }

    /// Execute a call with the caller's stored credential.
    pub async fn call(
        &self,
        provider: &str,
        service: &str,
        request: CloudApiRequest,
        cancel: &CancellationToken,
    ) -> GatewayResult<Transcoded> {
        if !self.private_auth.authenticate(&request.token).await {
            return Err(GatewayError::AuthenticationFailed);
        }
        self.check_catalog(provider, service).await?;

        let action = self
            .resolve_action(CallMode::Private, provider, service, &request.action)
            .await?;
        let credential = self
            .credentials
            .resolve(&request.token.id, provider, &request.name)
            .await;

        Ok(self
            .execute(
                CallMode::Private,
                CallDescriptor::new(provider, service, action, request.region, credential)
                    .with_parameters(request.params),
                cancel,
            )
            .await)
    }

    /// Execute a call with an inline credential, authorized by the open token.
    pub async fn call_raw(
        &self,
        provider: &str,
        service: &str,
        request: CloudApiRawRequest,
        cancel: &CancellationToken,
    ) -> GatewayResult<Transcoded> {
        if !self.open_auth.authenticate(&request.token).await {
            return Err(GatewayError::InvalidOpenToken);
        }
        self.check_catalog(provider, service).await?;

        let action = self
            .resolve_action(CallMode::Raw, provider, service, &request.action)
            .await?;
        let credential = CloudCredential::new(request.cloud_id, request.cloud_key);

        Ok(self
            .execute(
                CallMode::Raw,
                CallDescriptor::new(provider, service, action, request.region, credential)
                    .with_parameters(request.params),
                cancel,
            )
            .await)
    }

    async fn execute(
        &self,
        mode: CallMode,
        descriptor: CallDescriptor,
        cancel: &CancellationToken,
    ) -> Transcoded {
        let result = self.dispatcher.dispatch(&descriptor, cancel).await;
        transcode(&descriptor.provider, mode, result)
    }

    async fn check_catalog(&self, provider: &str, service: &str) -> GatewayResult<()> {
        if self.settings.enforce_service_catalog && !self.catalog.supports(provider, service).await
        {
            tracing::info!(provider, service, "service not in catalog");
            return Err(GatewayError::Forbidden(format!(
                "{provider}/{service} is not supported"
            )));
        }
        Ok(())
    }

    async fn resolve_action(
        &self,
        mode: CallMode,
        provider: &str,
        service: &str,
        action: &str,
    ) -> GatewayResult<String> {
        if action.is_empty() {
            return Err(GatewayError::BadRequest("missing field `action`".to_string()));
        }

        let mapping_enabled = match mode {
            CallMode::Private => self.settings.map_private_calls,
            CallMode::Raw => self.settings.map_raw_calls,
        };
        if !mapping_enabled {
            return Ok(action.to_string());
        }

        self.actions
            .map(provider, service, action)
            .await
            .ok_or_else(|| GatewayError::BadRequest(format!("unmapped action `{action}`")))
    }
}
