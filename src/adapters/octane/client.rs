use crate::adapters::octane::query::{self, Condition};
use crate::config::models::{AuthCredentials, ServerConfig};
use crate::core::error::{ApiError, AuthError};
use crate::core::types::{
    ApplicationModule, EntityPage, EntityRef, ModuleSelector, Release, ReleaseSelector,
    TestVersion, TestVersionFilter,
};
use crate::ports::OctaneApi;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// The test-version collection is only reachable with the tech-preview
/// client type.
const TECH_PREVIEW_CLIENT_TYPE: &str = "HPE_REST_API_TECH_PREVIEW";

const RELEASE_FIELDS: &str = "id,name,activity_level";
const MODULE_FIELDS: &str = "name,logical_name,id,path";
const TEST_VERSION_FIELDS: &str = "releases,name,test,comment";

pub(crate) struct OctaneClient {
    http_client: Client,
    server: ServerConfig,
}

impl OctaneClient {
    pub(crate) fn new(server: ServerConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "HPECLIENTTYPE",
            HeaderValue::from_static(TECH_PREVIEW_CLIENT_TYPE),
        );

        // The LWSSO session cookie issued by sign_in authenticates every
        // subsequent request.
        let http_client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(format!("relmark/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            server,
        })
    }

    pub(crate) async fn sign_in(&self, credentials: &AuthCredentials) -> Result<(), AuthError> {
        let url = format!("{}/authentication/sign_in", self.base_url());
        debug!("Signing in at {}", url);

        let response = self.http_client.post(&url).json(credentials).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { status, body });
        }
        Ok(())
    }

    fn base_url(&self) -> String {
        self.server.url.as_str().trim_end_matches('/').to_string()
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/shared_spaces/{}/workspaces/{}/{}",
            self.base_url(),
            self.server.shared_space_id,
            self.server.workspace_id,
            collection
        )
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        collection: &str,
        fields: &str,
        order_by: Option<&str>,
        offset: Option<u64>,
        limit: Option<usize>,
        condition: Option<&Condition>,
    ) -> Result<EntityPage<T>, ApiError> {
        let url = self.collection_url(collection);
        let mut request = self.http_client.get(&url).query(&[("fields", fields)]);
        if let Some(order_by) = order_by {
            request = request.query(&[("order_by", order_by)]);
        }
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        if let Some(condition) = condition {
            request = request.query(&[("query", condition.to_query_param())]);
        }

        let response = request.send().await?;
        let response = self.error_for_status(response).await?;
        response
            .json::<EntityPage<T>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn error_for_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden {
                workspace_id: self.server.workspace_id,
            });
        }
        if status == StatusCode::BAD_REQUEST && body.contains("limit") {
            return Err(ApiError::PageSizeRejected { body });
        }
        Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OctaneApi for OctaneClient {
    async fn find_releases(&self, selector: &ReleaseSelector) -> Result<Vec<Release>, ApiError> {
        let condition = query::release_condition(selector);
        let page = self
            .get_collection::<Release>(
                "releases",
                RELEASE_FIELDS,
                None,
                None,
                None,
                Some(&condition),
            )
            .await?;
        Ok(page.data)
    }

    async fn find_application_modules(
        &self,
        selector: &ModuleSelector,
    ) -> Result<Vec<ApplicationModule>, ApiError> {
        let condition = query::module_condition(selector);
        let page = self
            .get_collection::<ApplicationModule>(
                "product_areas",
                MODULE_FIELDS,
                None,
                None,
                None,
                Some(&condition),
            )
            .await?;
        Ok(page.data)
    }

    async fn fetch_test_versions(
        &self,
        filter: &TestVersionFilter,
        offset: u64,
        limit: usize,
    ) -> Result<EntityPage<TestVersion>, ApiError> {
        let condition = query::test_version_condition(filter);
        self.get_collection(
            "test_versions",
            TEST_VERSION_FIELDS,
            Some("-name"),
            Some(offset),
            Some(limit),
            condition.as_ref(),
        )
        .await
    }

    async fn update_test_version_releases(
        &self,
        test_version_id: &str,
        releases: &[EntityRef],
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/{}",
            self.collection_url("test_versions"),
            test_version_id
        );
        let body = json!({ "releases": { "data": releases } });

        let response = self.http_client.put(&url).json(&body).send().await?;
        self.error_for_status(response).await.map(|_| ())
    }
}
