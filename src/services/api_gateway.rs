// ============================================================================
// API GATEWAY - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// One request primitive; every domain method is a thin parameterization of
// it (method, path, optional entity query, JSON body). No retries, no
// timeouts: a failed call is reported exactly once.
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::models::auth::{Role, UserProfile};
use crate::services::error::ApiResult;

/// Auth endpoints the session store depends on. The store is handed this
/// trait rather than the concrete gateway so it can run against a stub.
#[async_trait(?Send)]
pub trait AuthApi {
    async fn signin(&self, email: &str, password: &str) -> ApiResult<Value>;
    async fn signup(&self, email: &str, password: &str, role: Role) -> ApiResult<Value>;
    async fn get_current_user(&self) -> ApiResult<UserProfile>;
}

/// Optional `?entity=` scope for list endpoints.
pub fn entity_query(entity: Option<&str>) -> String {
    match entity {
        Some(entity) => format!("?entity={}", urlencoding::encode(entity)),
        None => String::new(),
    }
}

#[cfg(target_arch = "wasm32")]
pub use fetch::ApiGateway;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use std::rc::Rc;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use serde::de::DeserializeOwned;
    use serde_json::Value;

    use super::{entity_query, AuthApi};
    use crate::models::auth::{Role, SigninRequest, SignupRequest, UserProfile};
    use crate::models::records::{FacilityDoc, Study, TestItem};
    use crate::services::error::{ApiError, ApiResult};
    use crate::services::response::{classify_fetch_error, decode_into, decode_response};
    use crate::utils::constants::{BACKEND_URL, KEY_TOKEN};
    use crate::utils::storage::KeyValueStorage;

    enum Method {
        Get,
        Post,
        Put,
        Delete,
    }

    /// Fetch-based gateway. Stateless apart from the base URL; the bearer
    /// token is read from storage on every call so it always reflects the
    /// current session.
    #[derive(Clone)]
    pub struct ApiGateway {
        base_url: String,
        storage: Rc<dyn KeyValueStorage>,
    }

    impl ApiGateway {
        pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
            Self {
                base_url: BACKEND_URL.to_string(),
                storage,
            }
        }

        /// The single request primitive. Extra headers merge in first; the
        /// computed Authorization header is applied last so callers cannot
        /// displace it.
        async fn request(
            &self,
            method: Method,
            path: &str,
            body: Option<&Value>,
            extra_headers: &[(&str, &str)],
        ) -> ApiResult<Value> {
            let url = format!("{}{}", self.base_url, path);

            let mut builder = match method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Delete => Request::delete(&url),
            };

            builder = builder.header("Content-Type", "application/json");
            for &(key, value) in extra_headers {
                builder = builder.header(key, value);
            }
            if let Some(token) = self.storage.get(KEY_TOKEN) {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }

            let sent = match body {
                Some(body) => {
                    builder
                        .json(body)
                        .map_err(|e| ApiError::Network(e.to_string()))?
                        .send()
                        .await
                }
                None => builder.send().await,
            };

            let response = sent.map_err(|e| classify_fetch_error(&e.to_string()))?;

            // read text first to avoid raising on malformed bodies
            let text = response.text().await.unwrap_or_default();
            decode_response(response.status(), &response.status_text(), &text)
        }

        async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
            decode_into(self.request(Method::Get, path, None, &[]).await?)
        }

        async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> ApiResult<T> {
            decode_into(self.request(Method::Post, path, Some(body), &[]).await?)
        }

        async fn put<T: DeserializeOwned>(&self, path: &str, body: &Value) -> ApiResult<T> {
            decode_into(self.request(Method::Put, path, Some(body), &[]).await?)
        }

        async fn delete(&self, path: &str) -> ApiResult<Value> {
            self.request(Method::Delete, path, None, &[]).await
        }

        fn to_body<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
            serde_json::to_value(value)
                .map_err(|e| ApiError::Protocol(format!("Could not serialize request: {}", e)))
        }

        // ---- Test items ----

        pub async fn get_test_items(&self, entity: Option<&str>) -> ApiResult<Vec<TestItem>> {
            self.get(&format!("/test-items{}", entity_query(entity)))
                .await
        }

        pub async fn get_test_item(&self, id: u32) -> ApiResult<TestItem> {
            self.get(&format!("/test-items/{}", id)).await
        }

        pub async fn create_test_item(&self, item: &TestItem) -> ApiResult<TestItem> {
            self.post("/test-items", &Self::to_body(item)?).await
        }

        pub async fn update_test_item(&self, id: u32, item: &TestItem) -> ApiResult<TestItem> {
            self.put(&format!("/test-items/{}", id), &Self::to_body(item)?)
                .await
        }

        pub async fn delete_test_item(&self, id: u32) -> ApiResult<Value> {
            self.delete(&format!("/test-items/{}", id)).await
        }

        // ---- Studies ----

        pub async fn get_studies(&self, entity: Option<&str>) -> ApiResult<Vec<Study>> {
            self.get(&format!("/studies{}", entity_query(entity))).await
        }

        pub async fn get_study(&self, id: u32) -> ApiResult<Study> {
            self.get(&format!("/studies/{}", id)).await
        }

        pub async fn create_study(&self, study: &Study) -> ApiResult<Study> {
            self.post("/studies", &Self::to_body(study)?).await
        }

        pub async fn update_study(&self, id: u32, study: &Study) -> ApiResult<Study> {
            self.put(&format!("/studies/{}", id), &Self::to_body(study)?)
                .await
        }

        pub async fn delete_study(&self, id: u32) -> ApiResult<Value> {
            self.delete(&format!("/studies/{}", id)).await
        }

        // ---- Facility docs ----

        pub async fn get_facility_docs(&self, entity: Option<&str>) -> ApiResult<Vec<FacilityDoc>> {
            self.get(&format!("/facility-docs{}", entity_query(entity)))
                .await
        }

        pub async fn get_facility_doc(&self, id: u32) -> ApiResult<FacilityDoc> {
            self.get(&format!("/facility-docs/{}", id)).await
        }

        pub async fn create_facility_doc(&self, doc: &FacilityDoc) -> ApiResult<FacilityDoc> {
            self.post("/facility-docs", &Self::to_body(doc)?).await
        }

        pub async fn update_facility_doc(&self, id: u32, doc: &FacilityDoc) -> ApiResult<FacilityDoc> {
            self.put(&format!("/facility-docs/{}", id), &Self::to_body(doc)?)
                .await
        }

        pub async fn delete_facility_doc(&self, id: u32) -> ApiResult<Value> {
            self.delete(&format!("/facility-docs/{}", id)).await
        }
    }

    #[async_trait(?Send)]
    impl AuthApi for ApiGateway {
        async fn signin(&self, email: &str, password: &str) -> ApiResult<Value> {
            log::info!("🔐 Signing in: {}", email);
            let body = Self::to_body(&SigninRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?;
            self.request(Method::Post, "/auth/signin", Some(&body), &[])
                .await
        }

        async fn signup(&self, email: &str, password: &str, role: Role) -> ApiResult<Value> {
            log::info!("📝 Signing up: {} ({})", email, role.as_str());
            let body = Self::to_body(&SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                role,
            })?;
            self.request(Method::Post, "/auth/signup", Some(&body), &[])
                .await
        }

        async fn get_current_user(&self) -> ApiResult<UserProfile> {
            decode_into(self.request(Method::Get, "/auth/me", None, &[]).await?)
        }
    }
}
