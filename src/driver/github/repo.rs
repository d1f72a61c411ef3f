use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::ScmError;
use crate::driver::list_path;
use crate::model::{
    Hook, HookEvents, HookInput, ListOptions, Perm, RepoListOptions, RepoSearchTerm, Repository,
    State, Status, StatusInput, Visibility,
};
use crate::service;
use crate::transport::{AuthContext, Request, Response};

use super::{WireUser, Wrapper};

/// GitHub implementation of [`service::RepositoryService`].
#[derive(Clone)]
pub struct RepositoryService {
    client: Wrapper,
}

impl RepositoryService {
    pub(crate) const fn new(client: Wrapper) -> Self {
        Self { client }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct WireRepository {
    id: i64,
    owner: WireUser,
    name: String,
    full_name: String,
    permissions: Option<WirePerm>,
    default_branch: String,
    archived: bool,
    private: bool,
    visibility: String,
    html_url: String,
    clone_url: String,
    ssh_url: String,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSearch {
    items: Vec<WireRepository>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePerm {
    admin: bool,
    push: bool,
    pull: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireHook {
    id: i64,
    name: String,
    events: Vec<String>,
    active: bool,
    config: WireHookConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireHookConfig {
    url: String,
    insecure_ssl: String,
}

#[derive(Debug, Serialize)]
struct WireHookInput<'a> {
    name: &'static str,
    active: bool,
    events: Vec<String>,
    config: WireHookInputConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireHookInputConfig<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    secret: &'a str,
    content_type: &'static str,
    insecure_ssl: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireStatus {
    state: String,
    context: String,
    description: Option<String>,
    target_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireStatusInput<'a> {
    state: &'static str,
    context: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    target_url: &'a str,
}

#[async_trait]
impl service::RepositoryService for RepositoryService {
    async fn find(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(Repository, Response), ScmError> {
        let (out, res) = self
            .client
            .json::<WireRepository>(auth, Request::get(format!("repos/{repo}")))
            .await?;
        Ok((convert_repository(out), res))
    }

    async fn find_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
    ) -> Result<(Hook, Response), ScmError> {
        let path = format!("repos/{repo}/hooks/{id}");
        let (out, res) = self.client.json::<WireHook>(auth, Request::get(path)).await?;
        Ok((convert_hook(out), res))
    }

    async fn find_perms(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(Perm, Response), ScmError> {
        let (out, res) = self
            .client
            .json::<WireRepository>(auth, Request::get(format!("repos/{repo}")))
            .await?;
        Ok((convert_repository(out).perm.unwrap_or_default(), res))
    }

    async fn list(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        let path = list_path(
            "user/repos?visibility=all&affiliation=owner,collaborator,organization_member"
                .to_string(),
            opts,
            "per_page",
        );
        let (out, res) = self
            .client
            .json::<Vec<WireRepository>>(auth, Request::get(path))
            .await?;
        Ok((out.into_iter().map(convert_repository).collect(), res))
    }

    async fn list_v2(
        &self,
        auth: Option<&AuthContext>,
        opts: &RepoListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        let path = list_path(
            format!("search/repositories?{}", encode_search(&opts.search)),
            &opts.list,
            "per_page",
        );
        let (out, res) = self
            .client
            .json::<WireSearch>(auth, Request::get(path))
            .await?;
        Ok((out.items.into_iter().map(convert_repository).collect(), res))
    }

    async fn list_namespace(
        &self,
        auth: Option<&AuthContext>,
        namespace: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        let path = list_path(format!("orgs/{namespace}/repos"), opts, "per_page");
        let (out, res) = self
            .client
            .json::<Vec<WireRepository>>(auth, Request::get(path))
            .await?;
        Ok((out.into_iter().map(convert_repository).collect(), res))
    }

    async fn list2(
        &self,
        auth: Option<&AuthContext>,
        namespace: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError> {
        service::RepositoryService::list_namespace(self, auth, namespace, opts).await
    }

    async fn list_repo_languages(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(HashMap<String, f64>, Response), ScmError> {
        let path = format!("repos/{repo}/languages");
        let (out, res) = self
            .client
            .json::<HashMap<String, u64>>(auth, Request::get(path))
            .await?;
        Ok((convert_languages(&out), res))
    }

    async fn list_hooks(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Hook>, Response), ScmError> {
        let path = list_path(
            format!("repos/{repo}/hooks"),
            opts,
            "per_page",
        );
        let (out, res) = self.client.json::<Vec<WireHook>>(auth, Request::get(path)).await?;
        Ok((out.into_iter().map(convert_hook).collect(), res))
    }

    async fn list_status(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        reference: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Status>, Response), ScmError> {
        let path = list_path(
            format!("repos/{repo}/statuses/{reference}"),
            opts,
            "per_page",
        );
        let (out, res) = self
            .client
            .json::<Vec<WireStatus>>(auth, Request::get(path))
            .await?;
        Ok((out.into_iter().map(convert_status).collect(), res))
    }

    async fn create_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        input: &HookInput,
    ) -> Result<(Hook, Response), ScmError> {
        let body = convert_hook_input(input);
        let request = Wrapper::request(Method::POST, format!("repos/{repo}/hooks"), Some(&body))?;
        let (out, res) = self.client.json::<WireHook>(auth, request).await?;
        Ok((convert_hook(out), res))
    }

    async fn create_status(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        reference: &str,
        input: &StatusInput,
    ) -> Result<(Status, Response), ScmError> {
        let body = WireStatusInput {
            state: convert_from_state(input.state),
            context: &input.label,
            description: &input.desc,
            target_url: &input.target,
        };
        let path = format!("repos/{repo}/statuses/{reference}");
        let request = Wrapper::request(Method::POST, path, Some(&body))?;
        let (out, res) = self.client.json::<WireStatus>(auth, request).await?;
        Ok((convert_status(out), res))
    }

    async fn update_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
        input: &HookInput,
    ) -> Result<(Hook, Response), ScmError> {
        let body = convert_hook_input(input);
        let path = format!("repos/{repo}/hooks/{id}");
        let request = Wrapper::request(Method::PATCH, path, Some(&body))?;
        let (out, res) = self.client.json::<WireHook>(auth, request).await?;
        Ok((convert_hook(out), res))
    }

    async fn delete_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
    ) -> Result<Response, ScmError> {
        let request = Request::new(Method::DELETE, format!("repos/{repo}/hooks/{id}"));
        self.client.send(auth, request).await
    }
}

pub(super) fn convert_repository(from: WireRepository) -> Repository {
    let visibility = match from.visibility.as_str() {
        "public" => Visibility::Public,
        "internal" => Visibility::Internal,
        "private" => Visibility::Private,
        _ if from.private => Visibility::Private,
        _ if from.id != 0 => Visibility::Public,
        _ => Visibility::Undefined,
    };
    let namespace = if from.owner.login.is_empty() {
        from.full_name
            .split_once('/')
            .map(|(owner, _)| owner.to_string())
            .unwrap_or_default()
    } else {
        from.owner.login
    };

    Repository {
        id: if from.id == 0 {
            String::new()
        } else {
            from.id.to_string()
        },
        namespace,
        name: from.name,
        perm: from.permissions.map(|p| Perm {
            pull: p.pull,
            push: p.push,
            admin: p.admin,
        }),
        branch: from.default_branch,
        archived: from.archived,
        private: from.private,
        visibility,
        clone: from.clone_url,
        clone_ssh: from.ssh_url,
        link: from.html_url,
        created: from.created_at,
        updated: from.updated_at,
    }
}

/// Encodes the `q` parameter of a repository search. Forks are included.
fn encode_search(term: &RepoSearchTerm) -> String {
    let mut q: Vec<String> = Vec::new();
    if !term.repo_name.is_empty() {
        q.push(term.repo_name.clone());
    }
    if !term.user.is_empty() {
        q.push(format!("user:{}", term.user));
    }
    q.push("fork:true".to_string());

    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("q", &q.join(" "))
        .finish()
}

/// Turns byte counts per language into percentages of the total.
#[allow(clippy::cast_precision_loss)]
fn convert_languages(from: &HashMap<String, u64>) -> HashMap<String, f64> {
    let total: u64 = from.values().sum();
    if total == 0 {
        return HashMap::new();
    }
    from.iter()
        .map(|(name, bytes)| (name.clone(), *bytes as f64 * 100.0 / total as f64))
        .collect()
}

fn convert_hook(from: WireHook) -> Hook {
    Hook {
        id: from.id.to_string(),
        name: from.name,
        target: from.config.url,
        events: from.events,
        active: from.active,
        skip_verify: from.config.insecure_ssl == "1",
    }
}

fn convert_hook_input(input: &HookInput) -> WireHookInput<'_> {
    WireHookInput {
        name: "web",
        active: true,
        events: convert_hook_events(input.events, &input.native_events),
        config: WireHookInputConfig {
            url: &input.target,
            secret: &input.secret,
            content_type: "json",
            insecure_ssl: if input.skip_verify { "1" } else { "0" },
        },
    }
}

/// Maps canonical subscriptions to GitHub event names, without duplicates.
pub(super) fn convert_hook_events(events: HookEvents, native: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut add = |name: &str| {
        if !out.iter().any(|e| e == name) {
            out.push(name.to_string());
        }
    };

    if events.branch || events.tag {
        add("create");
        add("delete");
    }
    if events.deployment {
        add("deployment");
    }
    if events.issue {
        add("issues");
    }
    if events.issue_comment || events.pull_request_comment {
        add("issue_comment");
    }
    if events.pull_request {
        add("pull_request");
    }
    if events.push {
        add("push");
    }
    if events.review_comment {
        add("pull_request_review_comment");
    }
    for name in native {
        add(name);
    }
    out
}

fn convert_status(from: WireStatus) -> Status {
    Status {
        state: convert_state(&from.state),
        label: from.context,
        desc: from.description.unwrap_or_default(),
        target: from.target_url.unwrap_or_default(),
    }
}

fn convert_state(from: &str) -> State {
    match from {
        "pending" => State::Pending,
        "success" => State::Success,
        "failure" => State::Failure,
        "error" => State::Error,
        _ => State::Unknown,
    }
}

const fn convert_from_state(from: State) -> &'static str {
    match from {
        State::Pending | State::Running => "pending",
        State::Success => "success",
        State::Failure => "failure",
        State::Unknown | State::Canceled | State::Error => "error",
    }
}
