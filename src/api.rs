//! HTTP surface of the gateway
//!
//! `GET /` starts a session, `POST /input/:step` and
//! `GET /choose/:step/:option` continue it.

mod handlers;

pub use handlers::create_router;

use crate::backend::SessionBackend;
use crate::render::Renderer;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn SessionBackend>,
    pub renderer: Arc<Renderer>,
    cookie_key: Key,
}

impl AppState {
    pub fn new(backend: Arc<dyn SessionBackend>, renderer: Renderer, cookie_key: Key) -> Self {
        Self {
            backend,
            renderer: Arc::new(renderer),
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
