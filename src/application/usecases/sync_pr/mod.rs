//! PR/MR 분석 코멘트 동기화의 전체 흐름 유스케이스.

mod context;
mod preview;

use anyhow::Result;

use crate::application::ports::{
    CommentServiceFactory, ConfigRepository, HostTokenResolver, PrCommentService, Reporter,
    ReportProcessorFactory, TargetResolver,
};
use crate::application::usecases::post_issues::PostIssuesUseCase;
use crate::domain::sync::RunOptions;

use context::load_execution_context;
use preview::PreviewCommentService;

/// URL 입력부터 설정/토큰 해석, 오케스트레이터 실행까지 조율한다.
pub struct SyncPullRequestUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub host_token_resolver: &'a dyn HostTokenResolver,
    pub target_resolver: &'a dyn TargetResolver,
    pub comment_service_factory: &'a dyn CommentServiceFactory,
    pub report_processor_factory: &'a dyn ReportProcessorFactory,
    pub reporter: &'a dyn Reporter,
}

impl<'a> SyncPullRequestUseCase<'a> {
    /// 동기화 본 실행 진입점.
    /// dry-run이면 변경 파일 조회까지만 실제로 수행하고 삭제/생성은 출력으로 대체한다.
    pub async fn execute(&self, options: RunOptions) -> Result<()> {
        self.reporter.section("Session");
        self.reporter.kv("Target", &options.url);
        self.reporter.kv(
            "Mode",
            if options.dry_run {
                "dry-run"
            } else {
                "post-comments"
            },
        );

        let ctx = load_execution_context(self, &options)?;

        self.reporter.section("Sync Findings");
        self.reporter.kv(
            "Report",
            &ctx.report_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not configured)".to_string()),
        );

        let preview;
        let comment_service: &dyn PrCommentService = if options.dry_run {
            preview = PreviewCommentService::new(ctx.comment_service.as_ref(), self.reporter);
            &preview
        } else {
            ctx.comment_service.as_ref()
        };

        let post_issues = PostIssuesUseCase::new(
            ctx.report_processor.as_ref(),
            comment_service,
            ctx.message_limit,
        )
        .with_path_matcher(ctx.matcher.clone());
        self.reporter
            .kv("Limit", &post_issues.message_limit().to_string());

        post_issues
            .post_issues_to_pull_request(ctx.report_path.as_deref())
            .await?;

        self.reporter.section("Done");
        if !options.dry_run {
            self.reporter.status(
                "VCS",
                &format!("analysis threads synchronized on {}", ctx.target.label()),
            );
        }
        Ok(())
    }
}
