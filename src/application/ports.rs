//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, HostConfig};
use crate::domain::finding::Finding;
use crate::domain::target::PullRequestTarget;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// URL 입력값을 도메인 대상 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn parse(&self, input: &str) -> Result<PullRequestTarget>;
}

/// Host(VCS) 토큰 해석 결과.
#[derive(Debug, Clone, Default)]
pub struct HostTokenResolution {
    pub token: Option<String>,
    pub source: Option<String>,
}

/// Host(VCS) 토큰 해석 포트.
pub trait HostTokenResolver: Send + Sync {
    fn resolve(&self, host: &str, host_cfg: Option<&HostConfig>) -> Result<HostTokenResolution>;
}

/// 분석 리포트를 finding 목록으로 변환하는 포트.
/// 리포트가 없거나 형식이 잘못되면 에러를 반환한다.
pub trait ReportProcessor: Send + Sync {
    fn fetch_findings(&self, report_path: &Path) -> Result<Vec<Finding>>;
}

/// PR/MR 코멘트 스레드 연동 포트.
#[async_trait]
pub trait PrCommentService: Send + Sync {
    /// PR에서 변경된 파일 경로 목록
    async fn changed_files(&self) -> Result<Vec<String>>;
    /// 이전 실행이 남긴 분석 스레드를 모두 삭제(없어도 성공)
    async fn delete_analysis_threads(&self) -> Result<()>;
    /// finding마다 스레드 하나를 입력 순서대로 생성
    async fn create_threads(&self, findings: &[Finding]) -> Result<()>;
}

/// 대상/호스트 설정에 맞는 코멘트 서비스를 생성하는 팩토리 포트.
pub trait CommentServiceFactory: Send + Sync {
    fn build(
        &self,
        target: &PullRequestTarget,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn PrCommentService>;
}

/// 리포트 파서를 설정값에 맞게 생성하는 팩토리 포트.
pub trait ReportProcessorFactory: Send + Sync {
    fn build(&self, config: &Config) -> Box<dyn ReportProcessor>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn raw(&self, line: &str);
}
