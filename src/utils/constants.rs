/// URL base del backend
/// Configurada en tiempo de compilación:
/// - Desarrollo: http://localhost:3001/api (por defecto)
/// - Producción: via BACKEND_URL env var / .env
pub const BACKEND_URL: &str = match option_env!("BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:3001/api",
};

/// Fixed message shown when the fetch itself fails (connection refused, DNS).
/// Names the local backend address developers are expected to have running.
pub const CANNOT_CONNECT_MSG: &str =
    "Cannot connect to server. Please make sure the backend server is running on http://localhost:3001";

// localStorage keys owned by the session store. All four are removed
// together on sign-out; the entity key removal cascades to the inventory key.
pub const KEY_TOKEN: &str = "token";
pub const KEY_USER: &str = "user";
pub const KEY_SELECTED_ENTITY: &str = "selectedEntity";
pub const KEY_SELECTED_INVENTORY: &str = "selectedInventory";

/// Organizational entities a user can scope records to.
pub const ENTITIES: [&str; 3] = ["adgyl", "agro", "biopharma"];
