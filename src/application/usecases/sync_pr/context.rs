//! 동기화 실행 컨텍스트(설정/대상/토큰/협력 객체) 준비 단계.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{PrCommentService, ReportProcessor};
use crate::application::usecases::sync_pr::SyncPullRequestUseCase;
use crate::domain::path::{PathCase, PathMatcher};
use crate::domain::sync::RunOptions;
use crate::domain::target::{PullRequestTarget, ensure_token_available};

/// 오케스트레이터 실행에 필요한 값들을 모은 상태.
pub(super) struct ExecutionContext {
    pub target: PullRequestTarget,
    pub report_processor: Box<dyn ReportProcessor>,
    pub comment_service: Box<dyn PrCommentService>,
    pub report_path: Option<PathBuf>,
    pub message_limit: Option<usize>,
    pub matcher: PathMatcher,
}

/// 설정 로딩, 대상 파싱, 토큰 해석, 코멘트 서비스 생성까지 선행한다.
/// CLI 옵션 값이 설정 파일 값보다 우선한다.
pub(super) fn load_execution_context(
    use_case: &SyncPullRequestUseCase<'_>,
    options: &RunOptions,
) -> Result<ExecutionContext> {
    use_case.reporter.section("Load Config");
    let config = use_case
        .config_repo
        .load()
        .context("failed to load sonar-prca config")?;

    let target = use_case
        .target_resolver
        .parse(&options.url)
        .context("failed to parse pull request URL")?;
    use_case.reporter.kv("Host", &target.host);
    use_case.reporter.kv("Pull Request", &target.label());

    let host_cfg = config.host_config(&target.host);
    let token = use_case
        .host_token_resolver
        .resolve(&target.host, host_cfg)
        .context("failed to resolve VCS token")?;
    if let Some(source) = &token.source {
        use_case.reporter.kv("Token", source);
    }
    if !options.dry_run {
        ensure_token_available(&target, token.token.as_deref())?;
    }

    let comment_service = use_case
        .comment_service_factory
        .build(&target, host_cfg, token.token);
    let report_processor = use_case.report_processor_factory.build(&config);

    let case = PathCase::from_flag(
        options
            .case_insensitive_paths
            .or(config.defaults.case_insensitive_paths),
    );
    let matcher = PathMatcher::new(workspace_root(options), case);

    Ok(ExecutionContext {
        target,
        report_processor,
        comment_service,
        report_path: options.report_path.clone().or_else(|| config.report_path()),
        message_limit: options.message_limit.or(config.defaults.message_limit),
        matcher,
    })
}

/// 상대 경로 해석 기준. 미지정이면 현재 작업 디렉터리, 그마저 없으면 `/`.
fn workspace_root(options: &RunOptions) -> PathBuf {
    options
        .workspace_root
        .clone()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("/"))
}
