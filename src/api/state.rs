use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::Workspace;
use crate::infrastructure::AppConfig;

/// Every request that touches the workspace holds this lock until it
/// responds, so uploads and questions run strictly one at a time.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Mutex<Workspace>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(workspace: Workspace, config: AppConfig) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            config: Arc::new(config),
        }
    }
}
