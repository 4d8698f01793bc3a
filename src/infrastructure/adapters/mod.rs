//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod comment_service_factory;
mod config_repository;
mod host_token_resolver;
mod report_processor_factory;
mod reporter;
mod target_resolver;

pub use comment_service_factory::VcsCommentServiceFactory;
pub use config_repository::JsonConfigRepository;
pub use host_token_resolver::HostTokenResolverAdapter;
pub use report_processor_factory::SonarReportProcessorFactory;
pub use reporter::ConsoleReporter;
pub use target_resolver::UrlTargetResolver;
