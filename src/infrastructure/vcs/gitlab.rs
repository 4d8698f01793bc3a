//! GitLab API 연동 구현(MR 노트/디스커션).

use anyhow::{Context, Result};
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
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

pub struct GitLabClient {
    client: Client,
    host: String,
    project_path: String,
    iid: u64,
    token: Option<String>,
    api_base: Option<String>,
}

impl GitLabClient {
    /// GitLab 대상 클라이언트를 생성한다.
    pub fn new(
        host: String,
        project_path: String,
        iid: u64,
        token: Option<String>,
        api_base: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            host,
            project_path,
            iid,
            token,
            api_base,
        }
    }

    fn api_base(&self) -> String {
        // gitlab.com은 공개 API, 그 외는 self-hosted 기본 경로를 사용한다.
        if let Some(base) = &self.api_base {
            return base.trim_end_matches('/').to_string();
        }
        format!("https://{}/api/v4", self.host)
    }

    fn merge_request_endpoint(&self) -> String {
        // /projects/{path} API 규격에 맞춰 경로를 URL 인코딩한다.
        format!(
            "{}/projects/{}/merge_requests/{}",
            self.api_base(),
            utf8_percent_encode(&self.project_path, NON_ALPHANUMERIC),
            self.iid
        )
    }

    fn notes_endpoint(&self) -> String {
        format!("{}/notes", self.merge_request_endpoint())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        // GitLab 토큰 헤더(`PRIVATE-TOKEN`)를 공통 적용한다.
        let req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req.header("PRIVATE-TOKEN", token)
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
                .with_context(|| format!("gitlab: failed to {action}"))?;
            let body = success_body(resp, "gitlab", action).await?;
            let batch: Vec<T> = serde_json::from_str(&body)
                .with_context(|| format!("gitlab: invalid {action} JSON"))?;

            let last = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if last {
                break;
            }
        }
        Ok(items)
    }

    async fn fetch_diff_refs(&self) -> Result<DiffRefs> {
        let resp = self
            .request(Method::GET, self.merge_request_endpoint())
            .send()
            .await
            .context("gitlab: failed to fetch MR")?;
        let body = success_body(resp, "gitlab", "fetch MR metadata").await?;

        let mr: MergeRequestResponse =
            serde_json::from_str(&body).context("gitlab: invalid MR JSON")?;
        mr.diff_refs
            .context("gitlab: MR response missing diff_refs")
    }

    async fn send_post(&self, url: String, payload: &Value, action: &str) -> Result<Response> {
        self.request(Method::POST, url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("gitlab: failed to {action}"))
    }
}

#[derive(Debug, Deserialize)]
struct MergeRequestResponse {
    diff_refs: Option<DiffRefs>,
}

#[derive(Debug, Clone, Deserialize)]
struct DiffRefs {
    base_sha: String,
    start_sha: String,
    head_sha: String,
}

#[derive(Debug, Deserialize)]
struct MergeRequestChangesResponse {
    changes: Vec<MergeRequestChange>,
}

#[derive(Debug, Deserialize)]
struct MergeRequestChange {
    new_path: String,
    #[serde(default)]
    deleted_file: bool,
}

#[derive(Debug, Deserialize)]
struct NoteResponse {
    id: u64,
    #[serde(default)]
    body: String,
}

#[async_trait]
impl PrCommentService for GitLabClient {
    async fn changed_files(&self) -> Result<Vec<String>> {
        let resp = self
            .request(
                Method::GET,
                format!("{}/changes", self.merge_request_endpoint()),
            )
            .send()
            .await
            .context("gitlab: failed to fetch MR changes")?;
        let body = success_body(resp, "gitlab", "fetch MR changes").await?;

        let changes: MergeRequestChangesResponse =
            serde_json::from_str(&body).context("gitlab: invalid MR changes JSON")?;

        Ok(changes
            .changes
            .into_iter()
            .filter(|c| !c.deleted_file)
            .map(|c| c.new_path)
            .collect())
    }

    async fn delete_analysis_threads(&self) -> Result<()> {
        let notes: Vec<NoteResponse> = self
            .get_all_pages(self.notes_endpoint(), "list notes")
            .await?;

        let mut deleted = 0usize;
        for note in notes.iter().filter(|n| is_analysis_thread(&n.body)) {
            let resp = self
                .request(
                    Method::DELETE,
                    format!("{}/{}", self.notes_endpoint(), note.id),
                )
                .send()
                .await
                .context("gitlab: failed to delete note")?;
            success_body(resp, "gitlab", "delete note").await?;
            deleted += 1;
        }
        debug!("gitlab: deleted {deleted} analysis notes");
        Ok(())
    }

    async fn create_threads(&self, findings: &[Finding]) -> Result<()> {
        if findings.is_empty() {
            return Ok(());
        }

        let refs = self.fetch_diff_refs().await?;
        let discussions = format!("{}/discussions", self.merge_request_endpoint());

        for finding in findings {
            let resp = match finding.line {
                Some(line) => {
                    let path = comment_path(&finding.file);
                    let body = render_finding_markdown(finding);
                    let resp = self
                        .send_post(
                            discussions.clone(),
                            &discussion_payload(&body, &refs, &path, line),
                            "create discussion",
                        )
                        .await?;
                    if line_anchor_rejected(resp.status()) {
                        debug!(
                            "gitlab: line {line} of {path} rejected ({}), posting note",
                            resp.status()
                        );
                        let body = render_file_level_markdown(finding);
                        self.send_post(
                            self.notes_endpoint(),
                            &json!({ "body": body }),
                            "create note",
                        )
                        .await?
                    } else {
                        resp
                    }
                }
                // 라인이 없으면 위치 지정 없이 일반 노트로 남긴다.
                None => {
                    let body = render_finding_markdown(finding);
                    self.send_post(
                        self.notes_endpoint(),
                        &json!({ "body": body }),
                        "create note",
                    )
                    .await?
                }
            };
            success_body(resp, "gitlab", "create analysis thread").await?;
        }
        Ok(())
    }
}

fn discussion_payload(body: &str, refs: &DiffRefs, path: &str, line: u32) -> Value {
    json!({
        "body": body,
        "position": {
            "position_type": "text",
            "base_sha": refs.base_sha,
            "start_sha": refs.start_sha,
            "head_sha": refs.head_sha,
            "old_path": path,
            "new_path": path,
            "new_line": line,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_path_is_percent_encoded() {
        let client = GitLabClient::new(
            "gitlab.com".to_string(),
            "group/sub/project".to_string(),
            15,
            None,
            None,
        );
        assert_eq!(
            client.merge_request_endpoint(),
            "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/merge_requests/15"
        );
        assert_eq!(
            client.notes_endpoint(),
            "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/merge_requests/15/notes"
        );
    }

    #[test]
    fn api_base_override_wins() {
        let client = GitLabClient::new(
            "git.corp".to_string(),
            "team/app".to_string(),
            1,
            None,
            Some("https://git.corp/gitlab/api/v4/".to_string()),
        );
        assert_eq!(
            client.merge_request_endpoint(),
            "https://git.corp/gitlab/api/v4/projects/team%2Fapp/merge_requests/1"
        );
    }

    #[test]
    fn discussion_position_anchors_the_new_line() {
        let refs = DiffRefs {
            base_sha: "base".to_string(),
            start_sha: "start".to_string(),
            head_sha: "head".to_string(),
        };
        let payload = discussion_payload("b", &refs, "src/a.ts", 12);

        assert_eq!(payload["position"]["position_type"], "text");
        assert_eq!(payload["position"]["new_path"], "src/a.ts");
        assert_eq!(payload["position"]["new_line"], 12);
        assert_eq!(payload["position"]["head_sha"], "head");
    }

    #[test]
    fn notes_page_picks_out_analysis_threads() {
        let page: Vec<NoteResponse> = serde_json::from_str(
            r#"[{"id": 1, "body": "looks good"}, {"id": 2, "body": "<!-- sonar-prca -->\n..."}, {"id": 3}]"#,
        )
        .unwrap();
        let marked: Vec<u64> = page
            .iter()
            .filter(|n| is_analysis_thread(&n.body))
            .map(|n| n.id)
            .collect();
        assert_eq!(marked, [2]);
    }

    #[test]
    fn deleted_files_are_flagged_in_changes() {
        let parsed: MergeRequestChangesResponse = serde_json::from_str(
            r#"{ "changes": [
                { "new_path": "src/a.ts", "deleted_file": false },
                { "new_path": "src/gone.ts", "deleted_file": true },
                { "new_path": "src/b.ts" }
            ] }"#,
        )
        .unwrap();
        let kept: Vec<&str> = parsed
            .changes
            .iter()
            .filter(|c| !c.deleted_file)
            .map(|c| c.new_path.as_str())
            .collect();
        assert_eq!(kept, ["src/a.ts", "src/b.ts"]);
    }
}
