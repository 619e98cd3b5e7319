// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Architecture document retrieval
//!
//! A document comes from the GitLab raw-file API, a direct URL, or a local
//! file. Each load is one bounded request with no retry; a failed load
//! returns an error and produces no document.

use crate::document::ArchitectureDocument;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Public GitLab instance
pub const DEFAULT_GITLAB_BASE_URL: &str = "https://gitlab.com";

/// Branch used when none is configured
pub const DEFAULT_BRANCH: &str = "main";

/// Errors raised while loading an architecture document
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server rejected the credentials (401/403)
    #[error("authorization failed (HTTP {status}): a valid GitLab token with read_api scope is required")]
    Unauthorized {
        /// HTTP status code
        status: u16,
    },

    /// Any other non-success response
    #[error("request to {url} failed with HTTP {status}")]
    Status {
        /// Requested URL (without credentials)
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Connection, timeout or body transfer failure
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`)
    #[error("base URL cannot have path segments: {0}")]
    NotABaseUrl(String),

    /// Project or file path missing from the GitLab location
    #[error("a GitLab project and file path are required")]
    MissingLocation,

    /// The body is not JSON
    #[error("document is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// A local document could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// True for credential problems the user can fix by supplying a token
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// How the token is presented to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `PRIVATE-TOKEN: <token>` (personal access tokens)
    #[default]
    PrivateToken,
    /// `Authorization: Bearer <token>` (OAuth tokens)
    Bearer,
}

impl std::str::FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private-token" | "private_token" | "private" => Ok(Self::PrivateToken),
            "bearer" | "oauth" => Ok(Self::Bearer),
            _ => Err(format!("Unknown auth scheme: {s}. Valid: private-token, bearer")),
        }
    }
}

/// A file inside a GitLab project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitlabLocation {
    /// Instance root, e.g. `https://gitlab.com`
    pub base_url: String,
    /// Numeric ID or `namespace/project`
    pub project: String,
    /// Path of the JSON file in the repository
    pub file_path: String,
    /// Branch, tag or commit
    pub branch: Option<String>,
}

impl GitlabLocation {
    /// `{base}/api/v4/projects/{project}/repository/files/{file_path}/raw?ref={branch}`
    ///
    /// Project and file path are each encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Fails when the location is incomplete or the base URL is invalid.
    pub fn raw_file_url(&self) -> Result<Url, FetchError> {
        if self.project.trim().is_empty() || self.file_path.trim().is_empty() {
            return Err(FetchError::MissingLocation);
        }

        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| FetchError::NotABaseUrl(self.base_url.clone()))?;
            segments.pop_if_empty().extend([
                "api",
                "v4",
                "projects",
                self.project.as_str(),
                "repository",
                "files",
                self.file_path.as_str(),
                "raw",
            ]);
        }
        let branch = self
            .branch
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BRANCH);
        url.query_pairs_mut().append_pair("ref", branch);
        Ok(url)
    }
}

/// Where to load the architecture document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// GitLab raw-file API
    Gitlab(GitlabLocation),
    /// Any URL returning the JSON document
    Url(String),
    /// Local JSON file
    File(PathBuf),
}

impl DocumentSource {
    /// Interpret a command-line argument: URLs are fetched, anything else is a path
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("https://") || arg.starts_with("http://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Does loading this source touch the network?
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::File(_))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gitlab(location) => write!(
                f,
                "gitlab:{}:{}@{}",
                location.project,
                location.file_path,
                location.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
            ),
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads architecture documents
pub struct Fetcher {
    client: Client,
    token: Option<String>,
    auth: AuthScheme,
}

impl Fetcher {
    /// Create a fetcher with a request timeout and optional token
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration, token: Option<String>, auth: AuthScheme) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("c4-analytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            auth,
        })
    }

    /// Load and parse a document
    ///
    /// # Errors
    ///
    /// See [`FetchError`]; no partial document is ever returned.
    pub fn load(&self, source: &DocumentSource) -> Result<ArchitectureDocument, FetchError> {
        info!("Loading architecture document from {}", source);
        let bytes = match source {
            DocumentSource::Gitlab(location) => self.get(location.raw_file_url()?)?,
            DocumentSource::Url(url) => self.get(Url::parse(url)?)?,
            DocumentSource::File(path) => fs::read(path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?,
        };
        ArchitectureDocument::from_slice(&bytes).map_err(FetchError::Parse)
    }

    fn get(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url.clone());
        match (&self.token, self.auth) {
            (Some(token), AuthScheme::PrivateToken) => request = request.header("PRIVATE-TOKEN", token),
            (Some(token), AuthScheme::Bearer) => request = request.bearer_auth(token),
            (None, _) => warn!("No GitLab token provided; private projects will be rejected"),
        }

        let response = request.send()?;
        check_status(&url, response.status())?;
        let bytes = response.bytes()?;
        debug!("Received {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Map a response status to the error a caller should act on
///
/// # Errors
///
/// [`FetchError::Unauthorized`] for 401/403, [`FetchError::Status`] for any
/// other non-success code.
pub fn check_status(url: &Url, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FetchError::Unauthorized { status: status.as_u16() });
    }
    let mut shown = url.clone();
    // Userinfo is never echoed back; the setters only fail for cannot-be-a-base URLs.
    let _ = shown.set_username("");
    let _ = shown.set_password(None);
    Err(FetchError::Status {
        url: shown.to_string(),
        status: status.as_u16(),
    })
}
