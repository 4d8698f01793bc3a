//! GitHub API 연동 구현(PR 리뷰 코멘트).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{PAGE_SIZE, comment_path, line_anchor_rejected, success_body};
use crate::application::ports::PrCommentService;
use crate::domain::finding::Finding;
use crate::domain::policy::is_analysis_thread;
use crate::infrastructure::render::{render_file_level_markdown, render_finding_markdown};

pub struct GitHubClient {
    client: Client,
    host: String,
    owner: String,
    repo: String,
    number: u64,
    token: Option<String>,
    api_base: Option<String>,
}

impl GitHubClient {
    /// GitHub 대상 클라이언트를 생성한다.
    pub fn new(
        host: String,
        owner: String,
        repo: String,
        number: u64,
        token: Option<String>,
        api_base: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            host,
            owner,
            repo,
            number,
            token,
            api_base,
        }
    }

    fn api_base(&self) -> String {
        // github.com은 공개 API, 그 외는 Enterprise 기본 경로를 사용한다.
        if let Some(base) = &self.api_base {
            return base.trim_end_matches('/').to_string();
        }
        if self.host == "github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }

    fn repo_endpoint(&self) -> String {
        format!("{}/repos/{}/{}", self.api_base(), self.owner, self.repo)
    }

    fn pull_endpoint(&self) -> String {
        format!("{}/pulls/{}", self.repo_endpoint(), self.number)
    }

    fn review_comment_endpoint(&self, comment_id: u64) -> String {
        format!("{}/pulls/comments/{}", self.repo_endpoint(), comment_id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        // 공통 헤더/인증 적용.
        let req = self
            .client
            .request(method, url)
            .header("User-Agent", "sonar-prca")
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    /// 짧은 페이지가 나올 때까지 목록 API를 순회한다.
    async fn get_all_pages<T: DeserializeOwned + Send>(
        &self,
        url: String,
        action: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in 1usize.. {
            let resp = self
                .request(Method::GET, url.clone())
                .query(&[("per_page", PAGE_SIZE), ("page", page)])
                .send()
                .await
                .with_context(|| format!("github: failed to {action}"))?;
            let body = success_body(resp, "github", action).await?;
            let batch: Vec<T> = serde_json::from_str(&body)
                .with_context(|| format!("github: invalid {action} JSON"))?;

            let last = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if last {
                break;
            }
        }
        Ok(items)
    }

    async fn post_review_comment(&self, endpoint: &str, payload: &Value) -> Result<Response> {
        self.request(Method::POST, endpoint.to_string())
            .json(payload)
            .send()
            .await
            .context("github: failed to create review comment")
    }

    async fn fetch_head_sha(&self) -> Result<String> {
        let resp = self
            .request(Method::GET, self.pull_endpoint())
            .send()
            .await
            .context("github: failed to fetch PR")?;
        let body = success_body(resp, "github", "fetch PR metadata").await?;

        let pr: PullResponse = serde_json::from_str(&body).context("github: invalid PR JSON")?;
        Ok(pr.head.sha)
    }
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    head: PullHead,
}

#[derive(Debug, Deserialize)]
struct PullHead {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullFileResponse {
    filename: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ReviewCommentResponse {
    id: u64,
    #[serde(default)]
    body: String,
}

#[async_trait]
impl PrCommentService for GitHubClient {
    async fn changed_files(&self) -> Result<Vec<String>> {
        let files: Vec<PullFileResponse> = self
            .get_all_pages(format!("{}/files", self.pull_endpoint()), "list PR files")
            .await?;

        // 삭제된 파일에는 리뷰 코멘트를 달 수 없다.
        Ok(files
            .into_iter()
            .filter(|f| f.status != "removed")
            .map(|f| f.filename)
            .collect())
    }

    async fn delete_analysis_threads(&self) -> Result<()> {
        let comments: Vec<ReviewCommentResponse> = self
            .get_all_pages(
                format!("{}/comments", self.pull_endpoint()),
                "list review comments",
            )
            .await?;

        let mut deleted = 0usize;
        for comment in comments.iter().filter(|c| is_analysis_thread(&c.body)) {
            let resp = self
                .request(Method::DELETE, self.review_comment_endpoint(comment.id))
                .send()
                .await
                .context("github: failed to delete review comment")?;
            success_body(resp, "github", "delete review comment").await?;
            deleted += 1;
        }
        debug!("github: deleted {deleted} analysis comments");
        Ok(())
    }

    async fn create_threads(&self, findings: &[Finding]) -> Result<()> {
        if findings.is_empty() {
            return Ok(());
        }

        let head_sha = self.fetch_head_sha().await?;
        let endpoint = format!("{}/comments", self.pull_endpoint());

        for finding in findings {
            let path = comment_path(&finding.file);
            let resp = match finding.line {
                Some(line) => {
                    let body = render_finding_markdown(finding);
                    let resp = self
                        .post_review_comment(
                            &endpoint,
                            &line_comment_payload(&body, &head_sha, &path, line),
                        )
                        .await?;
                    if line_anchor_rejected(resp.status()) {
                        debug!(
                            "github: line {line} of {path} rejected ({}), posting file comment",
                            resp.status()
                        );
                        let body = render_file_level_markdown(finding);
                        self.post_review_comment(
                            &endpoint,
                            &file_comment_payload(&body, &head_sha, &path),
                        )
                        .await?
                    } else {
                        resp
                    }
                }
                None => {
                    let body = render_finding_markdown(finding);
                    self.post_review_comment(
                        &endpoint,
                        &file_comment_payload(&body, &head_sha, &path),
                    )
                    .await?
                }
            };
            success_body(resp, "github", "create review comment").await?;
        }
        Ok(())
    }
}

fn line_comment_payload(body: &str, commit_id: &str, path: &str, line: u32) -> Value {
    json!({
        "body": body,
        "commit_id": commit_id,
        "path": path,
        "line": line,
        "side": "RIGHT",
    })
}

fn file_comment_payload(body: &str, commit_id: &str, path: &str) -> Value {
    json!({
        "body": body,
        "commit_id": commit_id,
        "path": path,
        "subject_type": "file",
    })
}
