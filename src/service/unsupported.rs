use std::collections::HashMap;

use async_trait::async_trait;

use crate::ScmError;
use crate::model::{
    App, Hook, HookInput, Installation, InstallationToken, InstallationTokenOptions, ListOptions,
    Perm, RepoListOptions, Repository, Status, StatusInput, Webhook,
};
use crate::transport::{AuthContext, Response};

use super::{AppsService, RepositoryService, SecretResolver, WebhookService};

/// Fills a resource domain the provider has no analogue for.
///
/// Every operation returns [`ScmError::NotSupported`] without touching the
/// network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl RepositoryService for Unsupported {
    async fn find(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
    ) -> Result<(Repository, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_hook(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _id: &str,
    ) -> Result<(Hook, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_perms(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
    ) -> Result<(Perm, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list(
        &self,
        _auth: Option<&AuthContext>,
        _opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_v2(
        &self,
        _auth: Option<&AuthContext>,
        _opts: &RepoListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_namespace(
        &self,
        _auth: Option<&AuthContext>,
        _namespace: &str,
        _opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list2(
        &self,
        _auth: Option<&AuthContext>,
        _namespace: &str,
        _opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_repo_languages(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
    ) -> Result<(HashMap<String, f64>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_hooks(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _opts: &ListOptions,
    ) -> Result<(Vec<Hook>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_status(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _reference: &str,
        _opts: &ListOptions,
    ) -> Result<(Vec<Status>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn create_hook(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _input: &HookInput,
    ) -> Result<(Hook, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn create_status(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _reference: &str,
        _input: &StatusInput,
    ) -> Result<(Status, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn update_hook(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _id: &str,
        _input: &HookInput,
    ) -> Result<(Hook, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn delete_hook(
        &self,
        _auth: Option<&AuthContext>,
        _repo: &str,
        _id: &str,
    ) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }
}

#[async_trait]
impl AppsService for Unsupported {
    async fn get(
        &self,
        _auth: Option<&AuthContext>,
        _slug: &str,
    ) -> Result<(App, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_installations(
        &self,
        _auth: Option<&AuthContext>,
        _opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn get_installation(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
    ) -> Result<(Installation, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn list_user_installations(
        &self,
        _auth: Option<&AuthContext>,
        _opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn suspend_installation(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
    ) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn unsuspend_installation(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
    ) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn delete_installation(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
    ) -> Result<Response, ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn create_installation_token(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
        _opts: Option<&InstallationTokenOptions>,
    ) -> Result<(InstallationToken, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_organization_installation(
        &self,
        _auth: Option<&AuthContext>,
        _org: &str,
    ) -> Result<(Installation, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_repository_installation(
        &self,
        _auth: Option<&AuthContext>,
        _owner: &str,
        _repo: &str,
    ) -> Result<(Installation, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_repository_installation_by_id(
        &self,
        _auth: Option<&AuthContext>,
        _id: i64,
    ) -> Result<(Installation, Response), ScmError> {
        Err(ScmError::NotSupported)
    }

    async fn find_user_installation(
        &self,
        _auth: Option<&AuthContext>,
        _user: &str,
    ) -> Result<(Installation, Response), ScmError> {
        Err(ScmError::NotSupported)
    }
}

impl WebhookService for Unsupported {
    fn parse(
        &self,
        _request: &http::Request<Vec<u8>>,
        _resolver: Option<&dyn SecretResolver>,
    ) -> Result<Webhook, ScmError> {
        Err(ScmError::NotSupported)
    }
}
