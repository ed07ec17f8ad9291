use crate::session::SessionController;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
///
/// Control operations serialize through the controller mutex, so no two
/// session transitions can ever run concurrently.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<SessionController>>,
}

impl AppState {
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}
