//! 입력 URL을 GitHub PR / GitLab MR 대상으로 해석하는 모듈.

use anyhow::{Result, anyhow, bail};
use url::Url;

/// 코멘트를 동기화할 PR/MR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub host: String,
    pub url: String,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    GitHub {
        owner: String,
        repo: String,
        number: u64,
    },
    GitLab {
        project_path: String,
        iid: u64,
    },
}

impl PullRequestTarget {
    /// URL 패턴을 보고 GitHub/GitLab 대상을 자동 감지한다.
    /// `/files`, `/diffs` 같은 하위 탭 경로가 붙어 있어도 허용한다.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow!("URL host is missing"))?
            .to_string();

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        let kind = github_kind(&segments)
            .or_else(|| gitlab_kind(&segments))
            .ok_or_else(|| anyhow!("unsupported pull request URL: {input}"))?;

        Ok(Self {
            host,
            url: input.trim().to_string(),
            kind,
        })
    }

    /// 콘솔 표시용 짧은 이름(owner/repo#12, group/project!7).
    pub fn label(&self) -> String {
        match &self.kind {
            TargetKind::GitHub {
                owner,
                repo,
                number,
            } => format!("{owner}/{repo}#{number}"),
            TargetKind::GitLab { project_path, iid } => format!("{project_path}!{iid}"),
        }
    }
}

fn github_kind(segments: &[&str]) -> Option<TargetKind> {
    // /owner/repo/pull/<number>[/...]
    let [owner, repo, "pull", number, ..] = segments else {
        return None;
    };
    Some(TargetKind::GitHub {
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        number: number.parse().ok()?,
    })
}

fn gitlab_kind(segments: &[&str]) -> Option<TargetKind> {
    // /group/.../project/-/merge_requests/<iid>[/...]
    let sep = segments.iter().position(|s| *s == "-")?;
    if sep == 0 || segments.get(sep + 1) != Some(&"merge_requests") {
        return None;
    }
    let iid = segments.get(sep + 2)?.parse().ok()?;

    Some(TargetKind::GitLab {
        project_path: segments[..sep].join("/"),
        iid,
    })
}

/// 토큰이 필요한데 없을 때의 안내 메시지를 만든다.
pub fn ensure_token_available(target: &PullRequestTarget, token: Option<&str>) -> Result<()> {
    if token.is_none() {
        bail!(
            "missing VCS token for host '{host}'. Configure hosts.{host}.token, token_env or token_command in config, or use --dry-run",
            host = target.host,
        );
    }
    Ok(())
}
