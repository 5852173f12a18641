// ============================================================================
// SESSION STORE - Estado de sesión + persistencia
// ============================================================================
// Single process-wide session: token, user profile and the entity/inventory
// selection. Every mutation is mirrored synchronously to storage so the
// session survives reloads. Clone and share; all copies see the same state.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::auth::{AuthPayload, Role, UserProfile};
use crate::services::api_gateway::AuthApi;
use crate::services::error::ApiResult;
use crate::utils::constants::{
    KEY_SELECTED_ENTITY, KEY_SELECTED_INVENTORY, KEY_TOKEN, KEY_USER,
};
use crate::utils::storage::{load_json, save_json, KeyValueStorage};

#[derive(Clone)]
pub struct SessionStore {
    token: Rc<RefCell<Option<String>>>,
    user: Rc<RefCell<Option<UserProfile>>>,
    selected_entity: Rc<RefCell<Option<String>>>,
    selected_inventory: Rc<RefCell<Option<String>>>,
    bootstrapped: Rc<RefCell<bool>>,
    api: Rc<dyn AuthApi>,
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Create the store and hydrate it from persisted state. A corrupt
    /// persisted profile reads as not-signed-in rather than an error.
    pub fn new(api: Rc<dyn AuthApi>, storage: Rc<dyn KeyValueStorage>) -> Self {
        let token = storage.get(KEY_TOKEN);
        let user = load_json::<UserProfile>(storage.as_ref(), KEY_USER);
        let selected_entity = storage.get(KEY_SELECTED_ENTITY);
        let selected_inventory = storage.get(KEY_SELECTED_INVENTORY);

        Self {
            token: Rc::new(RefCell::new(token)),
            user: Rc::new(RefCell::new(user)),
            selected_entity: Rc::new(RefCell::new(selected_entity)),
            selected_inventory: Rc::new(RefCell::new(selected_inventory)),
            bootstrapped: Rc::new(RefCell::new(false)),
            api,
            storage,
        }
    }

    /// Validate a persisted token against `/auth/me`. Runs at most once per
    /// application lifetime; later calls are no-ops. An invalid or expired
    /// token is cleaned up locally and silently - the user just lands on
    /// the sign-in screen.
    pub async fn bootstrap(&self) {
        if std::mem::replace(&mut *self.bootstrapped.borrow_mut(), true) {
            return;
        }
        if self.token.borrow().is_none() {
            return;
        }

        log::info!("🔑 Validating stored session token...");
        match self.api.get_current_user().await {
            Ok(profile) => {
                log::info!("✅ Session restored: {}", profile.email);
                self.set_user(profile);
            }
            Err(e) => {
                log::warn!("⚠️ Stored token rejected ({}), clearing session", e);
                *self.token.borrow_mut() = None;
                *self.user.borrow_mut() = None;
                self.storage.remove(KEY_TOKEN);
                self.storage.remove(KEY_USER);
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<()> {
        let payload = self.api.signin(email, password).await?;
        let auth = AuthPayload::from_value(&payload)?;
        log::info!("✅ Signed in: {}", email);
        self.apply_auth(auth);
        Ok(())
    }

    pub async fn sign_up(&self, email: &str, password: &str, role: Role) -> ApiResult<()> {
        let payload = self.api.signup(email, password, role).await?;
        let auth = AuthPayload::from_value(&payload)?;
        log::info!("✅ Signed up: {} ({})", email, role.as_str());
        self.apply_auth(auth);
        Ok(())
    }

    /// Clear the whole session, memory and storage. No network call;
    /// idempotent.
    pub fn sign_out(&self) {
        log::info!("👋 Signing out");
        *self.token.borrow_mut() = None;
        *self.user.borrow_mut() = None;
        *self.selected_entity.borrow_mut() = None;
        *self.selected_inventory.borrow_mut() = None;
        self.storage.remove(KEY_TOKEN);
        self.storage.remove(KEY_USER);
        self.storage.remove(KEY_SELECTED_ENTITY);
        self.storage.remove(KEY_SELECTED_INVENTORY);
    }

    /// Select (or clear) the organizational entity. A stale inventory
    /// selection from a different entity is never valid, so any previous
    /// inventory is dropped alongside.
    pub fn select_entity(&self, entity: Option<&str>) {
        match entity {
            Some(entity) => {
                *self.selected_entity.borrow_mut() = Some(entity.to_string());
                self.storage.set(KEY_SELECTED_ENTITY, entity);
            }
            None => {
                *self.selected_entity.borrow_mut() = None;
                self.storage.remove(KEY_SELECTED_ENTITY);
            }
        }
        *self.selected_inventory.borrow_mut() = None;
        self.storage.remove(KEY_SELECTED_INVENTORY);
    }

    /// Select (or clear) the inventory within the current entity. No
    /// compatibility check against the selected entity happens here; that
    /// is the caller's responsibility.
    pub fn select_inventory(&self, inventory: Option<&str>) {
        match inventory {
            Some(inventory) => {
                *self.selected_inventory.borrow_mut() = Some(inventory.to_string());
                self.storage.set(KEY_SELECTED_INVENTORY, inventory);
            }
            None => {
                *self.selected_inventory.borrow_mut() = None;
                self.storage.remove(KEY_SELECTED_INVENTORY);
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.borrow().clone()
    }

    pub fn selected_entity(&self) -> Option<String> {
        self.selected_entity.borrow().clone()
    }

    pub fn selected_inventory(&self) -> Option<String> {
        self.selected_inventory.borrow().clone()
    }

    /// Authenticated means a user profile is loaded. Token possession is
    /// orthogonal: some backend flows sign a user in without issuing one.
    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .borrow()
            .as_ref()
            .and_then(|u| u.role)
            .map_or(false, |role| role == Role::Admin)
    }

    fn apply_auth(&self, auth: AuthPayload) {
        let (token, user) = auth.into_parts();
        if let Some(token) = token {
            self.storage.set(KEY_TOKEN, &token);
            *self.token.borrow_mut() = Some(token);
        }
        self.set_user(user);
    }

    fn set_user(&self, user: UserProfile) {
        save_json(self.storage.as_ref(), KEY_USER, &user);
        *self.user.borrow_mut() = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ApiError;
    use crate::utils::storage::MemoryStorage;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    struct StubApi {
        auth_response: ApiResult<Value>,
        me_response: ApiResult<UserProfile>,
        me_calls: RefCell<u32>,
    }

    impl StubApi {
        fn with_auth(auth_response: ApiResult<Value>) -> Self {
            Self {
                auth_response,
                me_response: Err(ApiError::UnexpectedShape),
                me_calls: RefCell::new(0),
            }
        }

        fn with_me(me_response: ApiResult<UserProfile>) -> Self {
            Self {
                auth_response: Err(ApiError::UnexpectedShape),
                me_response,
                me_calls: RefCell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthApi for StubApi {
        async fn signin(&self, _email: &str, _password: &str) -> ApiResult<Value> {
            self.auth_response.clone()
        }

        async fn signup(&self, _email: &str, _password: &str, _role: Role) -> ApiResult<Value> {
            self.auth_response.clone()
        }

        async fn get_current_user(&self) -> ApiResult<UserProfile> {
            *self.me_calls.borrow_mut() += 1;
            self.me_response.clone()
        }
    }

    fn profile(id: u32) -> UserProfile {
        UserProfile {
            id,
            email: format!("user{}@lab.test", id),
            role: Some(Role::User),
        }
    }

    fn store_with(
        api: StubApi,
        seed: &[(&str, &str)],
    ) -> (SessionStore, Rc<MemoryStorage>, Rc<StubApi>) {
        let storage = Rc::new(MemoryStorage::new());
        for (key, value) in seed {
            storage.set(key, value);
        }
        let api = Rc::new(api);
        let store = SessionStore::new(api.clone(), storage.clone());
        (store, storage, api)
    }

    #[test]
    fn hydrates_from_persisted_state() {
        let api = StubApi::with_auth(Err(ApiError::UnexpectedShape));
        let (store, _, _) = store_with(
            api,
            &[
                (KEY_TOKEN, "stored-token"),
                (KEY_USER, r#"{"id":4,"email":"user4@lab.test","role":"user"}"#),
                (KEY_SELECTED_ENTITY, "agro"),
                (KEY_SELECTED_INVENTORY, "test-items"),
            ],
        );

        assert_eq!(store.token().as_deref(), Some("stored-token"));
        assert_eq!(store.user().map(|u| u.id), Some(4));
        assert_eq!(store.selected_entity().as_deref(), Some("agro"));
        assert_eq!(store.selected_inventory().as_deref(), Some("test-items"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn sign_in_with_token_and_user_persists_both() {
        let api = StubApi::with_auth(Ok(json!({
            "token": "jwt-1",
            "user": { "id": 1, "email": "user1@lab.test", "role": "user" }
        })));
        let (store, storage, _) = store_with(api, &[]);

        block_on(store.sign_in("user1@lab.test", "pw")).unwrap();

        assert_eq!(store.token().as_deref(), Some("jwt-1"));
        assert_eq!(store.user(), Some(profile(1)));
        assert_eq!(storage.get(KEY_TOKEN).as_deref(), Some("jwt-1"));
        assert!(storage.get(KEY_USER).is_some());
    }

    #[test]
    fn sign_in_with_bare_user_leaves_token_untouched() {
        let api = StubApi::with_auth(Ok(json!({ "id": 2, "email": "user2@lab.test" })));
        let (store, storage, _) = store_with(api, &[(KEY_TOKEN, "pre-existing")]);

        block_on(store.sign_in("user2@lab.test", "pw")).unwrap();

        assert_eq!(store.token().as_deref(), Some("pre-existing"));
        assert_eq!(storage.get(KEY_TOKEN).as_deref(), Some("pre-existing"));
        assert_eq!(store.user().map(|u| u.id), Some(2));
        assert!(store.is_authenticated());
    }

    #[test]
    fn sign_in_error_carries_server_message_unchanged() {
        let api = StubApi::with_auth(Err(ApiError::Http {
            status: 401,
            message: "Invalid email or password".to_string(),
        }));
        let (store, _, _) = store_with(api, &[]);

        let err = block_on(store.sign_in("x@lab.test", "bad")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn sign_in_rejects_unrecognized_payload() {
        let api = StubApi::with_auth(Ok(json!({ "status": "ok" })));
        let (store, storage, _) = store_with(api, &[]);

        let err = block_on(store.sign_in("x@lab.test", "pw")).unwrap_err();
        assert_eq!(err, ApiError::UnexpectedShape);
        assert!(store.user().is_none());
        assert!(storage.get(KEY_USER).is_none());
    }

    #[test]
    fn sign_up_stores_admin_session() {
        let api = StubApi::with_auth(Ok(json!({
            "token": "jwt-9",
            "user": { "id": 9, "email": "admin@lab.test", "role": "admin" }
        })));
        let (store, _, _) = store_with(api, &[]);

        block_on(store.sign_up("admin@lab.test", "pw", Role::Admin)).unwrap();
        assert!(store.is_admin());
        assert_eq!(store.token().as_deref(), Some("jwt-9"));
    }

    #[test]
    fn selecting_an_entity_clears_the_inventory() {
        let api = StubApi::with_auth(Err(ApiError::UnexpectedShape));
        let (store, storage, _) = store_with(api, &[]);

        store.select_entity(Some("adgyl"));
        store.select_inventory(Some("studies"));
        assert_eq!(store.selected_inventory().as_deref(), Some("studies"));

        store.select_entity(Some("biopharma"));
        assert_eq!(store.selected_entity().as_deref(), Some("biopharma"));
        assert_eq!(store.selected_inventory(), None);
        assert_eq!(storage.get(KEY_SELECTED_ENTITY).as_deref(), Some("biopharma"));
        assert_eq!(storage.get(KEY_SELECTED_INVENTORY), None);
    }

    #[test]
    fn clearing_the_entity_clears_both_selections() {
        let api = StubApi::with_auth(Err(ApiError::UnexpectedShape));
        let (store, storage, _) = store_with(
            api,
            &[(KEY_SELECTED_ENTITY, "agro"), (KEY_SELECTED_INVENTORY, "studies")],
        );

        store.select_entity(None);
        assert_eq!(store.selected_entity(), None);
        assert_eq!(store.selected_inventory(), None);
        assert_eq!(storage.get(KEY_SELECTED_ENTITY), None);
        assert_eq!(storage.get(KEY_SELECTED_INVENTORY), None);
    }

    #[test]
    fn sign_out_clears_every_field_and_key() {
        let api = StubApi::with_auth(Err(ApiError::UnexpectedShape));
        let (store, storage, _) = store_with(
            api,
            &[
                (KEY_TOKEN, "t"),
                (KEY_USER, r#"{"id":1,"email":"a@b.c"}"#),
                (KEY_SELECTED_ENTITY, "agro"),
                (KEY_SELECTED_INVENTORY, "studies"),
            ],
        );

        store.sign_out();
        // idempotent
        store.sign_out();

        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert_eq!(store.selected_entity(), None);
        assert_eq!(store.selected_inventory(), None);
        for key in [KEY_TOKEN, KEY_USER, KEY_SELECTED_ENTITY, KEY_SELECTED_INVENTORY] {
            assert_eq!(storage.get(key), None, "{} should be gone", key);
        }
    }

    #[test]
    fn bootstrap_with_valid_token_hydrates_and_persists_user() {
        let api = StubApi::with_me(Ok(profile(7)));
        let (store, storage, _) = store_with(api, &[(KEY_TOKEN, "jwt-7")]);

        block_on(store.bootstrap());

        assert_eq!(store.user(), Some(profile(7)));
        assert_eq!(store.token().as_deref(), Some("jwt-7"));
        assert!(storage.get(KEY_USER).is_some());
    }

    #[test]
    fn bootstrap_with_rejected_token_clears_token_and_user() {
        let api = StubApi::with_me(Err(ApiError::Http {
            status: 401,
            message: "token expired".to_string(),
        }));
        let (store, storage, _) = store_with(
            api,
            &[(KEY_TOKEN, "stale"), (KEY_USER, r#"{"id":1,"email":"a@b.c"}"#)],
        );

        block_on(store.bootstrap());

        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert_eq!(storage.get(KEY_TOKEN), None);
        assert_eq!(storage.get(KEY_USER), None);
    }

    #[test]
    fn bootstrap_runs_at_most_once() {
        let api = StubApi::with_me(Ok(profile(3)));
        let (store, _, api) = store_with(api, &[(KEY_TOKEN, "jwt-3")]);

        block_on(store.bootstrap());
        block_on(store.bootstrap());

        assert_eq!(*api.me_calls.borrow(), 1);
    }

    #[test]
    fn bootstrap_without_token_skips_the_network() {
        let api = StubApi::with_me(Ok(profile(3)));
        let (store, _, api) = store_with(api, &[]);

        block_on(store.bootstrap());

        assert_eq!(*api.me_calls.borrow(), 0);
        assert!(!store.is_authenticated());
    }
}
