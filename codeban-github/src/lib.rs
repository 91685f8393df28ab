//! # codeban-github
//!
//! Remote repository host client. Writes are guarded by a precondition token
//! derived from the file's *prior* contents — git's blob object hash — so the
//! host rejects the write if the file changed since it was read (optimistic
//! concurrency, equivalent to compare-and-swap).
//!
//! The engine consumes the [`RemoteHost`] trait rather than the concrete
//! client, so tests can substitute a recording mock.

pub mod error;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use sha1::{Digest, Sha1};

pub use error::RemoteError;

/// Default commit message for pushes produced by a reconciliation scan.
pub const SCAN_COMMIT_MESSAGE: &str = "Codeban automatic scan";

// ---------------------------------------------------------------------------
// Precondition token
// ---------------------------------------------------------------------------

/// Git blob object hash of `contents`: `sha1("blob {byte_len}\0{contents}")`,
/// hex-encoded. This is the precondition token the contents API expects in
/// the `sha` field when replacing an existing file.
pub fn blob_sha(contents: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", contents.len()).as_bytes());
    hasher.update(contents.as_bytes());
    hex::encode(hasher.finalize())
}

/// Repository name — the last `/`-separated segment of a remote URL.
pub fn repo_name(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

// ---------------------------------------------------------------------------
// RemoteHost trait
// ---------------------------------------------------------------------------

/// The single write operation the engine needs from the remote host.
pub trait RemoteHost {
    /// Replace the full contents of `path` in `owner/<repo of repo_url>`,
    /// guarded by the blob hash of `prior`. `new` is the complete new file.
    fn replace_file_contents(
        &self,
        owner: &str,
        repo_url: &str,
        path: &str,
        prior: &str,
        new: &str,
        message: &str,
    ) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

/// A repository the installation can access.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize)]
struct RepoList {
    repositories: Vec<RepoInfo>,
}

#[derive(Debug, Deserialize)]
struct RepoMeta {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
}

/// Head commit of a repository's default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCommit {
    pub sha: String,
    pub author_name: Option<String>,
    pub author_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// GitHub REST client authenticated with an installation access token.
pub struct GithubClient {
    agent: ureq::Agent,
    api_base: String,
    token: String,
}

impl GithubClient {
    /// Client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base("https://api.github.com", token)
    }

    /// Client against an explicit API base (GitHub Enterprise, test server).
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent: ureq::agent(),
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::Response, RemoteError> {
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| map_err(e, url))
    }

    /// Head commit of the repository's default branch.
    pub fn default_branch_head(
        &self,
        owner: &str,
        repo_url: &str,
    ) -> Result<HeadCommit, RemoteError> {
        let repo = repo_name(repo_url);
        let meta_url = format!("{}/repos/{owner}/{repo}", self.api_base);
        let meta: RepoMeta = self.get(&meta_url)?.into_json()?;

        let commit_url = format!(
            "{}/repos/{owner}/{repo}/commits/{}",
            self.api_base, meta.default_branch
        );
        let payload: CommitPayload = self.get(&commit_url)?.into_json()?;
        let author = payload.commit.author.unwrap_or(CommitAuthor {
            name: None,
            date: None,
        });
        Ok(HeadCommit {
            sha: payload.sha,
            author_name: author.name,
            author_date: author.date,
        })
    }

    /// Repositories the authenticated installation can access.
    pub fn list_accessible_repos(&self) -> Result<Vec<RepoInfo>, RemoteError> {
        let url = format!("{}/installation/repositories", self.api_base);
        let list: RepoList = self.get(&url)?.into_json()?;
        Ok(list.repositories)
    }

    /// Mint an installation access token. `app_jwt` is a pre-signed App JWT;
    /// producing it is an auth concern outside this crate.
    pub fn create_installation_access_token(
        &self,
        app_jwt: &str,
        installation_id: u64,
    ) -> Result<String, RemoteError> {
        let url = format!(
            "{}/app/installations/{installation_id}/access_tokens",
            self.api_base
        );
        let payload: TokenPayload = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {app_jwt}"))
            .set("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| map_err(e, &url))?
            .into_json()?;
        Ok(payload.token)
    }
}

impl RemoteHost for GithubClient {
    fn replace_file_contents(
        &self,
        owner: &str,
        repo_url: &str,
        path: &str,
        prior: &str,
        new: &str,
        message: &str,
    ) -> Result<(), RemoteError> {
        let repo = repo_name(repo_url);
        let url = format!("{}/repos/{owner}/{repo}/contents/{path}", self.api_base);
        let sha = blob_sha(prior);

        tracing::debug!("pushing {path} to {owner}/{repo} (precondition {sha})");

        let result = self
            .agent
            .put(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .send_json(serde_json::json!({
                "message": message,
                "content": BASE64.encode(new),
                "sha": sha,
            }));

        match result {
            Ok(_) => Ok(()),
            // 409/422 are the host's "sha does not match current contents"
            // responses — the lost-update race the precondition exists for.
            Err(ureq::Error::Status(409 | 422, _)) => Err(RemoteError::PreconditionFailed {
                path: path.to_owned(),
            }),
            Err(e) => Err(map_err(e, &url)),
        }
    }
}

fn map_err(err: ureq::Error, url: &str) -> RemoteError {
    match err {
        ureq::Error::Status(status, _) => RemoteError::Http {
            status,
            url: url.to_owned(),
        },
        ureq::Error::Transport(t) => RemoteError::Transport(t.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
