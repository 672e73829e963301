use crate::{models::DiagnosticsResponse, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Live room and process figures
pub async fn diagnostics(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<DiagnosticsResponse>) {

    let stats = app_state.sessions.stats();
    let n_conn = app_state.connections.count() as u32;
    let n_cached_code_blocks = app_state.code_blocks.cached_entries();

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Rooms: {}, Members: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        n_conn,
        stats.rooms,
        stats.members
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_conn,
            n_rooms: stats.rooms as u32,
            n_members: stats.members as u32,
            n_owners: stats.owners as u32,
            n_documents: stats.documents as u32,
            n_cached_code_blocks,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
