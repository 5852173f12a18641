// ============================================================================
// LAB ARCHIVE PWA - SESSION & API CORE (RUST PURO)
// ============================================================================
// Library core consumed by the record-entry front end:
// - Stores: session state (token, user, entity/inventory selection)
// - Services: API gateway + response normalization
// - Models: auth payloads and archive records shared with the backend
// - Utils: key-value persistence + compile-time constants
// ============================================================================

pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use models::auth::{AuthPayload, Role, UserProfile};
pub use services::error::{ApiError, ApiResult};
pub use stores::SessionStore;

#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Initialize console logging and panic reporting. Call once at startup,
/// before the first store or gateway is created.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("🚀 Lab Archive - session core ready");
}

/// Build the session store wired to the browser: localStorage persistence
/// and the fetch-based gateway. The returned store is `Clone`; hand copies
/// to whichever views need it.
#[cfg(target_arch = "wasm32")]
pub fn browser_session_store() -> SessionStore {
    let storage: Rc<dyn utils::storage::KeyValueStorage> = Rc::new(utils::storage::LocalStorage);
    let api = Rc::new(services::api_gateway::ApiGateway::new(storage.clone()));
    SessionStore::new(api, storage)
}
