use std::sync::Arc;

use crate::rooms::SessionManager;
use crate::services::CodeBlockService;
use crate::websocket::Connections;

/// Shared state handed to every HTTP and WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub connections: Arc<Connections>,
    pub code_blocks: Arc<CodeBlockService>,
}

impl AppState {
    pub fn new(code_blocks: CodeBlockService) -> Self {
        let connections = Arc::new(Connections::new());
        let sessions = Arc::new(SessionManager::new(connections.clone(), connections.clone()));
        Self {
            sessions,
            connections,
            code_blocks: Arc::new(code_blocks),
        }
    }
}
