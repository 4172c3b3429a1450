//! Management API backend over HTTP.

use crate::error::{ManagementError, ManagementResult};
use crate::models::{
    BaseUrl, BaseUrlInfo, BaseUrlList, BucketAcl, BucketCreate, BucketInfo, BucketQuotaParam,
    ReplicationGroup, ReplicationGroupList, UserCreateParam, UserDeleteParam, UserSecretKey,
    UserSecretKeyList,
};
use crate::traits::ManagementApi;
use async_trait::async_trait;
use objbroker_core::BucketQuota;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::instrument;

/// Header carrying the session token issued by `/login`.
pub const AUTH_TOKEN_HEADER: &str = "X-SDS-AUTH-TOKEN";

/// Management API client.
///
/// Logs in lazily on the first call and reuses the session token for the
/// lifetime of the backend.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
    token: OnceCell<String>,
}

impl HttpBackend {
    /// Create a backend for a management endpoint.
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> ManagementResult<Self> {
        let base_url = Url::parse(endpoint).map_err(|e| {
            ManagementError::Config(format!("invalid management endpoint {endpoint:?}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ManagementError::Config(format!(
                "management endpoint cannot be used as a base URL: {endpoint}"
            )));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            token: OnceCell::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> ManagementResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ManagementError::Config("management endpoint cannot be a base URL".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn namespaced_url(&self, segments: &[&str], namespace: &str) -> ManagementResult<Url> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut().append_pair("namespace", namespace);
        Ok(url)
    }

    async fn login(&self) -> ManagementResult<String> {
        let url = self.url(&["login"])?;
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ManagementError::Auth(format!(
                "login rejected ({status}): {body}"
            )));
        }

        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ManagementError::Auth("login response carried no auth token".to_string())
            })?;

        tracing::info!(endpoint = %self.base_url, "Authenticated with management API");
        Ok(token)
    }

    async fn token(&self) -> ManagementResult<&str> {
        self.token
            .get_or_try_init(|| self.login())
            .await
            .map(String::as_str)
    }

    /// End the management session, if one was opened.
    pub async fn logout(&self) -> ManagementResult<()> {
        let Some(token) = self.token.get() else {
            return Ok(());
        };
        let url = self.url(&["logout"])?;
        let response = self
            .http
            .get(url)
            .header(AUTH_TOKEN_HEADER, token)
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Management logout rejected");
        }
        Ok(())
    }

    async fn send(&self, req: RequestBuilder, resource: &str) -> ManagementResult<Response> {
        let token = self.token().await?;
        let response = req
            .header(AUTH_TOKEN_HEADER, token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ManagementError::NotFound(resource.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ManagementError::Auth(
                format!("{resource}: {status}: {body}"),
            )),
            _ => Err(ManagementError::Remote {
                status: status.as_u16(),
                body,
            }),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        resource: &str,
    ) -> ManagementResult<T> {
        let response = self.send(req, resource).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ManagementError::Decode(format!("{resource}: {e}")))
    }

    async fn send_empty(&self, req: RequestBuilder, resource: &str) -> ManagementResult<()> {
        self.send(req, resource).await?;
        Ok(())
    }

    async fn probe(&self, req: RequestBuilder, resource: &str) -> ManagementResult<bool> {
        match self.send(req, resource).await {
            Ok(_) => Ok(true),
            Err(ManagementError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ManagementApi for HttpBackend {
    #[instrument(skip(self), fields(backend = "http"))]
    async fn list_base_urls(&self) -> ManagementResult<Vec<BaseUrl>> {
        let url = self.url(&["object", "baseurl"])?;
        let list: BaseUrlList = self.send_json(self.http.get(url), "base urls").await?;
        Ok(list.base_url)
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn get_base_url(&self, id: &str) -> ManagementResult<BaseUrlInfo> {
        let url = self.url(&["object", "baseurl", id])?;
        self.send_json(self.http.get(url), &format!("base url {id}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn list_replication_groups(&self) -> ManagementResult<Vec<ReplicationGroup>> {
        let url = self.url(&["vdc", "data-service", "vpools"])?;
        let list: ReplicationGroupList = self
            .send_json(self.http.get(url), "replication groups")
            .await?;
        Ok(list.data_service_vpool)
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn bucket_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool> {
        let url = self.namespaced_url(&["object", "bucket", name, "info"], namespace)?;
        self.probe(self.http.get(url), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn get_bucket(&self, name: &str, namespace: &str) -> ManagementResult<BucketInfo> {
        let url = self.namespaced_url(&["object", "bucket", name, "info"], namespace)?;
        self.send_json(self.http.get(url), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self, params), fields(backend = "http", bucket = %params.name))]
    async fn create_bucket(&self, params: &BucketCreate) -> ManagementResult<()> {
        let url = self.url(&["object", "bucket"])?;
        self.send_empty(
            self.http.post(url).json(params),
            &format!("bucket {}", params.name),
        )
        .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn delete_bucket(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let url = self.namespaced_url(&["object", "bucket", name, "deactivate"], namespace)?;
        self.send_empty(self.http.post(url), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn create_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
        quota: BucketQuota,
    ) -> ManagementResult<()> {
        let url = self.url(&["object", "bucket", name, "quota"])?;
        let body = BucketQuotaParam::new(quota, namespace);
        self.send_empty(self.http.put(url).json(&body), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn get_bucket_quota(
        &self,
        name: &str,
        namespace: &str,
    ) -> ManagementResult<Option<BucketQuota>> {
        let url = self.namespaced_url(&["object", "bucket", name, "quota"], namespace)?;
        let param: BucketQuotaParam = self
            .send_json(self.http.get(url), &format!("bucket {name}"))
            .await?;
        Ok(param.quota())
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn delete_bucket_quota(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let url = self.namespaced_url(&["object", "bucket", name, "quota"], namespace)?;
        self.send_empty(self.http.delete(url), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn user_exists(&self, name: &str, namespace: &str) -> ManagementResult<bool> {
        let url = self.namespaced_url(&["object", "users", name, "info"], namespace)?;
        self.probe(self.http.get(url), &format!("user {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn create_user(&self, name: &str, namespace: &str) -> ManagementResult<()> {
        let url = self.url(&["object", "users"])?;
        let body = UserCreateParam {
            user: name.to_string(),
            namespace: namespace.to_string(),
        };
        self.send_empty(self.http.post(url).json(&body), &format!("user {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn delete_user(&self, name: &str) -> ManagementResult<()> {
        let url = self.url(&["object", "users", "deactivate"])?;
        let body = UserDeleteParam {
            user: name.to_string(),
        };
        self.send_empty(self.http.post(url).json(&body), &format!("user {name}"))
            .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn list_user_secrets(&self, name: &str) -> ManagementResult<Vec<UserSecretKey>> {
        let url = self.url(&["object", "user-secret-keys", name])?;
        let list: UserSecretKeyList = self
            .send_json(self.http.get(url), &format!("user {name}"))
            .await?;
        Ok(list.into_keys())
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn create_user_secret(&self, name: &str) -> ManagementResult<UserSecretKey> {
        let url = self.url(&["object", "user-secret-keys", name])?;
        self.send_json(
            self.http.post(url).json(&serde_json::json!({})),
            &format!("user {name}"),
        )
        .await
    }

    #[instrument(skip(self), fields(backend = "http"))]
    async fn get_bucket_acl(&self, name: &str, namespace: &str) -> ManagementResult<BucketAcl> {
        let url = self.namespaced_url(&["object", "bucket", name, "acl"], namespace)?;
        self.send_json(self.http.get(url), &format!("bucket {name}"))
            .await
    }

    #[instrument(skip(self, acl), fields(backend = "http"))]
    async fn update_bucket_acl(&self, name: &str, acl: &BucketAcl) -> ManagementResult<()> {
        let url = self.url(&["object", "bucket", name, "acl"])?;
        self.send_empty(self.http.put(url).json(acl), &format!("bucket {name}"))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn health_check(&self) -> ManagementResult<()> {
        self.token().await.map(|_| ())
    }

    async fn close(&self) -> ManagementResult<()> {
        self.logout().await
    }
}
