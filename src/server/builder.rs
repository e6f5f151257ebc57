//! ServerBuilder for fluent API to build the portal HTTP server

use super::router::build_portal_routes;
use crate::config::PortalConfig;
use crate::core::access::AccessGate;
use crate::core::auth::{AuthProvider, HeaderAuthProvider};
use crate::core::service::{DeferredAnalyzer, Repository, SymptomAnalyzer};
use crate::entities::{Appointment, SymptomAnalysis, User};
use crate::handlers::AppState;
use crate::storage::InMemoryRepository;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the portal server
///
/// Every collaborator has a default: header-based identities, in-memory
/// repositories and a deferred analyzer.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(PortalConfig::from_env()?)
///     .with_auth_provider(MyTokenProvider::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: PortalConfig,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    users: Option<Arc<dyn Repository<User>>>,
    appointments: Option<Arc<dyn Repository<Appointment>>>,
    analyses: Option<Arc<dyn Repository<SymptomAnalysis>>>,
    analyzer: Option<Arc<dyn SymptomAnalyzer>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: PortalConfig::default(),
            auth_provider: None,
            users: None,
            appointments: None,
            analyses: None,
            analyzer: None,
        }
    }

    pub fn with_config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the provider that turns request headers into a principal
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    pub fn with_user_repository(mut self, repo: impl Repository<User> + 'static) -> Self {
        self.users = Some(Arc::new(repo));
        self
    }

    pub fn with_appointment_repository(
        mut self,
        repo: impl Repository<Appointment> + 'static,
    ) -> Self {
        self.appointments = Some(Arc::new(repo));
        self
    }

    pub fn with_analysis_repository(
        mut self,
        repo: impl Repository<SymptomAnalysis> + 'static,
    ) -> Self {
        self.analyses = Some(Arc::new(repo));
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl SymptomAnalyzer + 'static) -> Self {
        self.analyzer = Some(Arc::new(analyzer));
        self
    }

    /// The access gate this builder will install
    pub fn access_gate(&self) -> AccessGate {
        AccessGate::portal_defaults().with_overrides(self.config.access.clone())
    }

    /// Build the application state shared by handlers
    pub fn build_state(&self) -> AppState {
        AppState {
            users: self
                .users
                .clone()
                .unwrap_or_else(|| Arc::new(InMemoryRepository::<User>::new())),
            appointments: self
                .appointments
                .clone()
                .unwrap_or_else(|| Arc::new(InMemoryRepository::<Appointment>::new())),
            analyses: self
                .analyses
                .clone()
                .unwrap_or_else(|| Arc::new(InMemoryRepository::<SymptomAnalysis>::new())),
            analyzer: self
                .analyzer
                .clone()
                .unwrap_or_else(|| Arc::new(DeferredAnalyzer)),
            validation: self.config.validation.clone(),
        }
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        self.config.validate()?;

        let gate = Arc::new(self.access_gate());
        let state = self.build_state();
        let provider = self
            .auth_provider
            .clone()
            .unwrap_or_else(|| Arc::new(HeaderAuthProvider));

        Ok(build_portal_routes(state, gate, provider))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.listen` from the configuration and stops on SIGTERM
    /// or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.listen_addr()?;
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for SIGTERM or Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::access::RouteAccess;
    use crate::core::access::RolePolicy;
    use crate::core::auth::Role;

    #[test]
    fn test_build_with_defaults() {
        assert!(ServerBuilder::new().build().is_ok());
    }

    #[test]
    fn test_build_rejects_invalid_listen_address() {
        let mut config = PortalConfig::default();
        config.server.listen = "not an address".to_string();
        assert!(ServerBuilder::new().with_config(config).build().is_err());
    }

    #[test]
    fn test_access_gate_applies_overrides() {
        let config = PortalConfig {
            access: vec![RouteAccess::new(
                "get",
                "/users/{id}",
                RolePolicy::HasRole(vec![Role::Admin]),
            )],
            ..Default::default()
        };
        let gate = ServerBuilder::new().with_config(config).access_gate();
        let route = gate.policy_for("GET", "/users/{id}").unwrap();
        assert_eq!(route.policy, RolePolicy::HasRole(vec![Role::Admin]));
        assert_eq!(gate.routes().len(), AccessGate::portal_defaults().routes().len());
    }

    #[test]
    fn test_state_carries_validation_settings() {
        let mut config = PortalConfig::default();
        config.validation.enforce_doctor_id_format = true;
        let state = ServerBuilder::new().with_config(config).build_state();
        assert!(state.validation.enforce_doctor_id_format);
    }
}
