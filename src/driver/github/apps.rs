use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::Method;
use serde::Deserialize;

use crate::ScmError;
use crate::driver::list_path;
use crate::model::{
    App, Installation, InstallationPermissions, InstallationToken, InstallationTokenOptions,
    ListOptions,
};
use crate::service;
use crate::transport::{AuthContext, Request, Response};

use super::repo::{WireRepository, convert_repository};
use super::{WireUser, Wrapper};

/// GitHub Apps implementation of [`service::AppsService`].
#[derive(Clone)]
pub struct AppsService {
    client: Wrapper,
}

impl AppsService {
    pub(crate) const fn new(client: Wrapper) -> Self {
        Self { client }
    }

    async fn installation(
        &self,
        auth: Option<&AuthContext>,
        path: String,
    ) -> Result<(Installation, Response), ScmError> {
        let (out, res) = self
            .client
            .json::<WireInstallation>(auth, Request::get(path))
            .await?;
        Ok((convert_installation(out), res))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireApp {
    id: i64,
    slug: String,
    node_id: String,
    owner: Option<WireUser>,
    name: String,
    description: Option<String>,
    external_url: String,
    html_url: String,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
    permissions: Option<InstallationPermissions>,
    events: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInstallation {
    id: i64,
    node_id: String,
    app_id: i64,
    app_slug: String,
    target_id: i64,
    account: Option<WireUser>,
    access_tokens_url: String,
    repositories_url: String,
    html_url: String,
    target_type: String,
    single_file_name: Option<String>,
    repository_selection: String,
    events: Vec<String>,
    single_file_paths: Vec<String>,
    permissions: Option<InstallationPermissions>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
    has_multiple_single_files: Option<bool>,
    suspended_by: Option<WireUser>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    suspended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInstallationList {
    installations: Vec<WireInstallation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInstallationToken {
    token: String,
    #[serde(deserialize_with = "crate::time::deserialize")]
    expires_at: Option<DateTime<Utc>>,
    permissions: Option<InstallationPermissions>,
    repositories: Vec<WireRepository>,
}

#[async_trait]
impl service::AppsService for AppsService {
    async fn get(
        &self,
        auth: Option<&AuthContext>,
        slug: &str,
    ) -> Result<(App, Response), ScmError> {
        let path = if slug.is_empty() {
            "app".to_string()
        } else {
            format!("apps/{slug}")
        };
        let (out, res) = self.client.json::<WireApp>(auth, Request::get(path)).await?;
        Ok((convert_app(out), res))
    }

    async fn list_installations(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError> {
        let path = list_path(
            "app/installations".to_string(),
            opts,
            "per_page",
        );
        let (out, res) = self
            .client
            .json::<Vec<WireInstallation>>(auth, Request::get(path))
            .await?;
        Ok((out.into_iter().map(convert_installation).collect(), res))
    }

    async fn get_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<(Installation, Response), ScmError> {
        self.installation(auth, format!("app/installations/{id}")).await
    }

    async fn list_user_installations(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError> {
        let path = list_path(
            "user/installations".to_string(),
            opts,
            "per_page",
        );
        let (out, res) = self
            .client
            .json::<WireInstallationList>(auth, Request::get(path))
            .await?;
        let list = out.installations.into_iter().map(convert_installation).collect();
        Ok((list, res))
    }

    async fn suspend_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError> {
        let path = format!("app/installations/{id}/suspended");
        self.client.send(auth, Request::new(Method::PUT, path)).await
    }

    async fn unsuspend_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError> {
        let path = format!("app/installations/{id}/suspended");
        self.client.send(auth, Request::new(Method::DELETE, path)).await
    }

    async fn delete_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError> {
        let path = format!("app/installations/{id}");
        self.client.send(auth, Request::new(Method::DELETE, path)).await
    }

    async fn create_installation_token(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
        opts: Option<&InstallationTokenOptions>,
    ) -> Result<(InstallationToken, Response), ScmError> {
        let path = format!("app/installations/{id}/access_tokens");
        let request = Wrapper::request(Method::POST, path, opts)?;
        let (out, res) = self
            .client
            .json::<WireInstallationToken>(auth, request)
            .await?;
        Ok((convert_installation_token(out), res))
    }

    async fn find_organization_installation(
        &self,
        auth: Option<&AuthContext>,
        org: &str,
    ) -> Result<(Installation, Response), ScmError> {
        self.installation(auth, format!("orgs/{org}/installation")).await
    }

    async fn find_repository_installation(
        &self,
        auth: Option<&AuthContext>,
        owner: &str,
        repo: &str,
    ) -> Result<(Installation, Response), ScmError> {
        self.installation(auth, format!("repos/{owner}/{repo}/installation"))
            .await
    }

    async fn find_repository_installation_by_id(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<(Installation, Response), ScmError> {
        self.installation(auth, format!("repositories/{id}/installation"))
            .await
    }

    async fn find_user_installation(
        &self,
        auth: Option<&AuthContext>,
        user: &str,
    ) -> Result<(Installation, Response), ScmError> {
        self.installation(auth, format!("users/{user}/installation")).await
    }
}

fn convert_app(from: WireApp) -> App {
    App {
        id: from.id,
        slug: from.slug,
        node_id: from.node_id,
        owner: from.owner.map(Into::into),
        name: from.name,
        description: from.description.unwrap_or_default(),
        external_url: from.external_url,
        html_url: from.html_url,
        created: from.created_at,
        updated: from.updated_at,
        permissions: from.permissions,
        events: from.events,
    }
}

fn convert_installation(from: WireInstallation) -> Installation {
    Installation {
        id: from.id,
        node_id: from.node_id,
        app_id: from.app_id,
        app_slug: from.app_slug,
        target_id: from.target_id,
        account: from.account.map(Into::into),
        access_tokens_url: from.access_tokens_url,
        repositories_url: from.repositories_url,
        html_url: from.html_url,
        target_type: from.target_type,
        single_file_name: from.single_file_name.unwrap_or_default(),
        repository_selection: from.repository_selection,
        events: from.events,
        single_file_paths: from.single_file_paths,
        permissions: from.permissions,
        created: from.created_at,
        updated: from.updated_at,
        has_multiple_single_files: from.has_multiple_single_files.unwrap_or_default(),
        suspended_by: from.suspended_by.map(Into::into),
        suspended_at: from.suspended_at,
    }
}

fn convert_installation_token(from: WireInstallationToken) -> InstallationToken {
    InstallationToken {
        token: from.token,
        expires: from.expires_at,
        permissions: from.permissions,
        repositories: from.repositories.into_iter().map(convert_repository).collect(),
    }
}
