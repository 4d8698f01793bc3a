//! 코멘트 서비스 팩토리 포트 구현 어댑터.

use crate::application::config::HostConfig;
use crate::application::ports::{CommentServiceFactory, PrCommentService};
use crate::domain::target::PullRequestTarget;
use crate::infrastructure::vcs;

/// 대상 URL 종류에 맞는 GitHub/GitLab 클라이언트를 만든다.
pub struct VcsCommentServiceFactory;

impl CommentServiceFactory for VcsCommentServiceFactory {
    fn build(
        &self,
        target: &PullRequestTarget,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn PrCommentService> {
        vcs::build_comment_service(target, host_cfg, token)
    }
}
