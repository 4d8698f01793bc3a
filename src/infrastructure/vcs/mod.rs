//! VCS 코멘트 서비스 구현 계층.
//! GitHub/GitLab별 REST 연동을 `PrCommentService` 포트로 묶는다.

pub mod github;
pub mod gitlab;

use anyhow::{Context, Result, bail};
use reqwest::{Response, StatusCode};

use crate::application::config::HostConfig;
use crate::application::ports::PrCommentService;
use crate::domain::target::{PullRequestTarget, TargetKind};

/// 페이지네이션 조회 시 페이지 크기.
pub(crate) const PAGE_SIZE: usize = 100;

pub fn build_comment_service(
    target: &PullRequestTarget,
    host_cfg: Option<&HostConfig>,
    token: Option<String>,
) -> Box<dyn PrCommentService> {
    // URL 해석 결과에 따라 적절한 VCS 구현체를 선택한다.
    let api_base = host_cfg.and_then(|h| h.api_base.clone());

    match &target.kind {
        TargetKind::GitHub {
            owner,
            repo,
            number,
        } => Box::new(github::GitHubClient::new(
            target.host.clone(),
            owner.clone(),
            repo.clone(),
            *number,
            token,
            api_base,
        )),
        TargetKind::GitLab { project_path, iid } => Box::new(gitlab::GitLabClient::new(
            target.host.clone(),
            project_path.clone(),
            *iid,
            token,
            api_base,
        )),
    }
}

/// 응답 본문을 읽고, 실패 상태면 본문을 포함한 에러로 변환한다.
pub(crate) async fn success_body(resp: Response, scope: &str, action: &str) -> Result<String> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .with_context(|| format!("{scope}: failed to read {action} response"))?;

    if !status.is_success() {
        bail!("{scope}: failed to {action} ({status}): {body}");
    }
    Ok(body)
}

/// 라인 위치 지정 코멘트가 거절된 응답인지 판정한다.
/// diff 밖의 라인이면 GitHub는 422, GitLab은 400을 돌려준다. 이 경우 파일 단위로 다시 게시한다.
pub(crate) fn line_anchor_rejected(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST
    )
}

/// 코멘트 API에 넘길 저장소 상대 경로로 정리한다.
pub(crate) fn comment_path(file: &str) -> String {
    let unified = file.replace('\\', "/");
    let mut path = unified.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_path_uses_forward_slashes() {
        assert_eq!(comment_path("src\\app\\main.ts"), "src/app/main.ts");
        assert_eq!(comment_path("./././src/a.ts"), "src/a.ts");
        assert_eq!(comment_path("src/a.ts"), "src/a.ts");
    }

    #[test]
    fn only_validation_failures_fall_back_to_file_level() {
        assert!(line_anchor_rejected(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(line_anchor_rejected(StatusCode::BAD_REQUEST));
        assert!(!line_anchor_rejected(StatusCode::CREATED));
        assert!(!line_anchor_rejected(StatusCode::UNAUTHORIZED));
        assert!(!line_anchor_rejected(StatusCode::NOT_FOUND));
        assert!(!line_anchor_rejected(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
