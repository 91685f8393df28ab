//! Shared plumbing: home resolution, remote client construction, actor
//! selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use codeban_core::registry;
use codeban_core::types::{Project, ProjectId, UserId};
use codeban_github::GithubClient;

/// Environment variable carrying the remote host token.
pub const TOKEN_ENV: &str = "CODEBAN_GITHUB_TOKEN";

/// Environment variable carrying the acting user id.
pub const USER_ENV: &str = "CODEBAN_USER";

pub fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

/// Remote client from `--token` or the environment.
pub fn client(token_flag: Option<String>) -> Result<GithubClient> {
    let token = match token_flag {
        Some(token) => token,
        None => std::env::var(TOKEN_ENV)
            .with_context(|| format!("no --token given and ${TOKEN_ENV} is unset"))?,
    };
    Ok(GithubClient::new(token))
}

/// Acting user: `--as`, then `$CODEBAN_USER`, then the project owner.
pub fn actor(actor_flag: Option<String>, project: &Project) -> UserId {
    actor_flag
        .or_else(|| std::env::var(USER_ENV).ok())
        .map(|id| UserId::from(id.as_str()))
        .unwrap_or_else(|| project.owner.id.clone())
}

pub fn load_project(home: &Path, id: &str) -> Result<Project> {
    registry::load_project_at(home, &ProjectId::from(id))
        .with_context(|| format!("failed to load project '{id}'"))
}
