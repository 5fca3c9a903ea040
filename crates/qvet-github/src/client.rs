//! GitHub REST client

use crate::error::{GitHubError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qvet_types::{
    CheckRun, CommitComparison, HostResult, NewStatus, OwnerRepo, SourceControl, Status, Tag,
    TagPage, User,
};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, LINK,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// `max-age` GitHub is known to send for commit statuses
pub const EXPECTED_STATUS_MAX_AGE_SECS: u64 = 60;

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;
const MAX_TEAM_PAGES: usize = 10;

#[derive(Deserialize)]
struct RepositoryPayload {
    default_branch: String,
}

#[derive(Deserialize)]
struct BranchPayload {
    commit: BranchCommit,
}

#[derive(Deserialize)]
struct BranchCommit {
    sha: String,
}

#[derive(Deserialize)]
struct CheckRunsPayload {
    check_runs: Vec<CheckRun>,
}

#[derive(Deserialize)]
struct ContentPayload {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

#[derive(Serialize)]
struct CreateStatusRequest<'a> {
    state: &'a str,
    context: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_url: Option<&'a str>,
}

/// Authenticated client for one GitHub API endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: Url,
}

impl GitHubClient {
    /// Create a client sending `token` as bearer credentials to `api_url`
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| GitHubError::Token(e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(concat!("qvet/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        let api_url = Url::parse(api_url.trim_end_matches('/'))?;
        if api_url.cannot_be_a_base() {
            return Err(GitHubError::BaseUrl(api_url.to_string()));
        }

        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::BaseUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &OwnerRepo, segments: &[&str]) -> Result<Url> {
        let mut all = vec!["repos", repo.owner.as_str(), repo.repo.as_str()];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "GitHub response");
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN
                && response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .is_some_and(|remaining| remaining == "0"));
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&body)
            .map(|payload| payload.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::NOT_FOUND => GitHubError::NotFound(what.to_string()),
            StatusCode::UNAUTHORIZED => GitHubError::Unauthorized(message),
            _ if rate_limited => GitHubError::RateLimited(message),
            _ => GitHubError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<(T, HeaderMap)> {
        let response = self.send(self.client.get(url), what).await?;
        let headers = response.headers().clone();
        let body = response
            .json::<T>()
            .await
            .map_err(|e| GitHubError::Decode(format!("{}: {}", what, e)))?;
        Ok((body, headers))
    }
}

/// Target of the `rel="next"` entry of a `Link` header
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == "rel=\"next\"") {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(target.to_string())
    })
}

fn max_age(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|value| value.parse().ok())
}

fn decode_content(payload: ContentPayload) -> Result<String> {
    match payload.encoding.as_deref() {
        Some("base64") | None => {
            let compact: String = payload
                .content
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|e| GitHubError::Decode(format!("file content: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|e| GitHubError::Decode(format!("file content: {}", e)))
        }
        Some(other) => Err(GitHubError::Decode(format!(
            "unsupported content encoding {:?}",
            other
        ))),
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn get_default_branch(&self, repo: &OwnerRepo) -> HostResult<String> {
        let url = self.repo_endpoint(repo, &[])?;
        let (payload, _) = self
            .get_json::<RepositoryPayload>(url, &format!("repository {}", repo))
            .await?;
        Ok(payload.default_branch)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn get_branch_tip(&self, repo: &OwnerRepo, branch: &str) -> HostResult<String> {
        let url = self.repo_endpoint(repo, &["branches", branch])?;
        let (payload, _) = self
            .get_json::<BranchPayload>(url, &format!("branch {}", branch))
            .await?;
        Ok(payload.commit.sha)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn list_tags(&self, repo: &OwnerRepo, page: u32, per_page: u32) -> HostResult<TagPage> {
        let mut url = self.repo_endpoint(repo, &["tags"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let (tags, headers) = self.get_json::<Vec<Tag>>(url, "tags").await?;
        Ok(TagPage {
            tags,
            has_next: next_link(&headers).is_some(),
        })
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn compare_commits(
        &self,
        repo: &OwnerRepo,
        base: &str,
        head: &str,
    ) -> HostResult<CommitComparison> {
        let basehead = format!("{}...{}", base, head);
        let url = self.repo_endpoint(repo, &["compare", &basehead])?;
        let (comparison, _) = self
            .get_json::<CommitComparison>(url, &format!("comparison {}", basehead))
            .await?;
        Ok(comparison)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn list_commit_statuses(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<Status>> {
        let mut url = self.repo_endpoint(repo, &["commits", sha, "statuses"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let (statuses, headers) = self
            .get_json::<Vec<Status>>(url, &format!("statuses of {}", sha))
            .await?;
        if let Some(max_age) = max_age(&headers) {
            if max_age != EXPECTED_STATUS_MAX_AGE_SECS {
                warn!(
                    max_age,
                    expected = EXPECTED_STATUS_MAX_AGE_SECS,
                    "Unexpected Cache-Control max-age on commit statuses"
                );
            }
        }
        Ok(statuses)
    }

    #[instrument(skip(self, repo, status), fields(repo = %repo, sha = %status.sha, context = %status.context))]
    async fn create_commit_status(
        &self,
        repo: &OwnerRepo,
        status: &NewStatus,
    ) -> HostResult<Status> {
        let url = self.repo_endpoint(repo, &["statuses", &status.sha])?;
        let body = CreateStatusRequest {
            state: status.state.as_str(),
            context: &status.context,
            description: &status.description,
            target_url: status.target_url.as_deref(),
        };

        let response = self
            .send(
                self.client.post(url).json(&body),
                &format!("commit {}", status.sha),
            )
            .await?;
        let created = response
            .json::<Status>()
            .await
            .map_err(|e| GitHubError::Decode(format!("created status: {}", e)))?;
        Ok(created)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn list_check_runs(&self, repo: &OwnerRepo, sha: &str) -> HostResult<Vec<CheckRun>> {
        let mut url = self.repo_endpoint(repo, &["commits", sha, "check-runs"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let (payload, _) = self
            .get_json::<CheckRunsPayload>(url, &format!("check-runs of {}", sha))
            .await?;
        Ok(payload.check_runs)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn get_file_contents(&self, repo: &OwnerRepo, path: &str) -> HostResult<Option<String>> {
        let mut segments = vec!["contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = self.repo_endpoint(repo, &segments)?;

        match self
            .get_json::<ContentPayload>(url, &format!("file {}", path))
            .await
        {
            Ok((payload, _)) => Ok(Some(decode_content(payload)?)),
            Err(GitHubError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn list_team_members(&self, org: &str, team_slug: &str) -> HostResult<Vec<User>> {
        let mut url = self.endpoint(&["orgs", org, "teams", team_slug, "members"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let what = format!("team {}/{}", org, team_slug);
        let mut members = Vec::new();
        for _ in 0..MAX_TEAM_PAGES {
            let (page, headers) = self.get_json::<Vec<User>>(url, &what).await?;
            members.extend(page);
            match next_link(&headers) {
                Some(next) => url = Url::parse(&next).map_err(GitHubError::from)?,
                None => return Ok(members),
            }
        }
        warn!(team = %what, pages = MAX_TEAM_PAGES, "Team roster truncated");
        Ok(members)
    }

    #[instrument(skip(self))]
    async fn get_authenticated_user(&self) -> HostResult<User> {
        let url = self.endpoint(&["user"])?;
        let (user, _) = self.get_json::<User>(url, "authenticated user").await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: reqwest::header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3/", "t").unwrap();
        let repo = OwnerRepo::new("octo", "widgets");
        let url = client
            .repo_endpoint(&repo, &["branches", "release/2024"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octo/widgets/branches/release%2F2024"
        );
    }

    #[test]
    fn test_next_link() {
        let link = headers(
            LINK,
            "<https://api.github.com/repositories/1/tags?page=2>; rel=\"next\", \
             <https://api.github.com/repositories/1/tags?page=5>; rel=\"last\"",
        );
        assert_eq!(
            next_link(&link).as_deref(),
            Some("https://api.github.com/repositories/1/tags?page=2")
        );

        let last_page = headers(
            LINK,
            "<https://api.github.com/repositories/1/tags?page=1>; rel=\"prev\"",
        );
        assert_eq!(next_link(&last_page), None);
        assert_eq!(next_link(&HeaderMap::new()), None);
    }

    #[test]
    fn test_max_age() {
        assert_eq!(max_age(&headers(CACHE_CONTROL, "private, max-age=60, s-maxage=60")), Some(60));
        assert_eq!(max_age(&headers(CACHE_CONTROL, "no-cache")), None);
    }

    #[test]
    fn test_decode_content_with_line_breaks() {
        let payload = ContentPayload {
            content: "Y29tbWl0Ogog\nIGJhc2U6IGRl\ndmVsb3AK\n".into(),
            encoding: Some("base64".into()),
        };
        assert_eq!(decode_content(payload).unwrap(), "commit:\n  base: develop\n");
    }

    #[test]
    fn test_invalid_api_url() {
        assert!(GitHubClient::new("not a url", "t").is_err());
        assert!(GitHubClient::new("mailto:someone@example.com", "t").is_err());
    }
}
