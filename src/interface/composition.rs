//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::sync_pr::SyncPullRequestUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, HostTokenResolverAdapter, JsonConfigRepository, SonarReportProcessorFactory,
    UrlTargetResolver, VcsCommentServiceFactory,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    host_token_resolver: HostTokenResolverAdapter,
    target_resolver: UrlTargetResolver,
    comment_service_factory: VcsCommentServiceFactory,
    report_processor_factory: SonarReportProcessorFactory,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            host_token_resolver: HostTokenResolverAdapter,
            target_resolver: UrlTargetResolver,
            comment_service_factory: VcsCommentServiceFactory,
            report_processor_factory: SonarReportProcessorFactory,
            reporter: ConsoleReporter::new(),
        }
    }
}

impl AppComposition {
    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 분석 코멘트 동기화 유스케이스를 생성한다.
    pub fn sync_usecase(&self) -> SyncPullRequestUseCase<'_> {
        SyncPullRequestUseCase {
            config_repo: &self.config_repo,
            host_token_resolver: &self.host_token_resolver,
            target_resolver: &self.target_resolver,
            comment_service_factory: &self.comment_service_factory,
            report_processor_factory: &self.report_processor_factory,
            reporter: &self.reporter,
        }
    }
}
