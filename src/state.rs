use crate::config::ApiConfig;
use crate::error::Result;
use crate::services::admin::AdminService;
use crate::services::auth::AuthService;
use crate::services::documents::DocumentService;
use crate::services::history::HistoryService;
use crate::services::shares::ShareService;
use crate::session_store::SessionStore;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

/// The application's client state: one session store, one transport, and
/// the orchestrators wired on top of them.
///
/// Construct once at application start and pass around explicitly; there
/// is no implicit global. Dropping it tears everything down.
#[derive(Clone)]
pub struct AppState {
    /// The client's configuration.
    pub config: ApiConfig,
    /// The advisory local session store.
    pub session: Arc<SessionStore>,
    /// The authentication orchestrator.
    pub auth: AuthService,
    /// The document-sharing orchestrator.
    pub shares: ShareService,
    /// The document CRUD orchestrator.
    pub documents: DocumentService,
    /// The activity-history orchestrator.
    pub history: HistoryService,
    /// The admin console orchestrator.
    pub admin: AdminService,
}

impl AppState {
    /// Creates a new `AppState` backed by the production HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `config` - The client's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let session = Arc::new(SessionStore::new());
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(config, session.clone())?);

        Ok(Self::with_transport(config.clone(), transport, session))
    }

    /// Creates a new `AppState` over an explicit transport and session
    /// store. This is the seam tests use to substitute an in-memory
    /// transport.
    ///
    /// # Arguments
    ///
    /// * `config` - The client's configuration.
    /// * `transport` - The transport port implementation.
    /// * `session` - The shared session store.
    pub fn with_transport(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
    ) -> Self {
        let auth = AuthService::new(transport.clone(), session.clone());
        let shares = ShareService::new(transport.clone());
        let documents = DocumentService::new(transport.clone());
        let history = HistoryService::new(transport.clone());
        let admin = AdminService::new(transport);
        tracing::info!("✅ Client state initialized");

        Self {
            config,
            session,
            auth,
            shares,
            documents,
            history,
            admin,
        }
    }
}
