use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::content_loader::Content;

pub type RefreshBroadcaster = broadcast::Sender<()>;

pub struct AppState {
    pub content: RwLock<Content>,
    pub content_dir: PathBuf,
    pub is_development: bool,
}

impl AppState {
    pub fn new(content: Content, content_dir: PathBuf, is_development: bool) -> Self {
        AppState {
            content: RwLock::new(content),
            content_dir,
            is_development,
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub app_state: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app_state.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
