//! Session-aware API client for the SafeDocs document-management backend.
//!
//! Every network call funnels through one transport that normalizes the
//! server's heterogeneous response shapes into a single envelope and
//! carries the session credential in an ambient cookie jar, never in
//! application code. Orchestrators for auth, document sharing, documents,
//! and the admin console sit on top of that transport and keep only
//! advisory local state.

pub mod config;
pub mod error;
pub mod session_store;
pub mod state;
pub mod transport;

pub mod models {
    pub mod document;
    pub mod history;
    pub mod share;
    pub mod user;
}

pub mod services {
    pub mod admin;
    pub mod auth;
    pub mod documents;
    pub mod history;
    pub mod shares;
}

pub mod validation {
    pub mod auth;
    pub mod share;
}

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use session_store::SessionStore;
pub use state::AppState;
pub use transport::{ApiResult, HttpTransport, Transport, UploadPayload};
