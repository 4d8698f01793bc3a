//! 병합된 설정과 토큰 출처를 확인하는 `config` 서브커맨드 유스케이스.

use anyhow::{Context, Result};

use crate::application::ports::ConfigRepository;

pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 탐색/로딩 경로, 유효 기본값, 호스트별 토큰 출처를 JSON 문자열로 반환한다.
    pub fn execute(&self) -> Result<String> {
        self.config_repo
            .inspect_pretty_json()
            .context("failed to inspect sonar-prca config")
    }
}
