//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::policy::DEFAULT_MESSAGE_LIMIT;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// VCS 호스트별 인증/엔드포인트 설정
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 한 번에 게시할 최대 finding 수
    pub message_limit: Option<usize>,
    /// SonarQube 리포트(JSON) 경로
    pub report_path: Option<String>,
    /// isNew=false 이슈 제외 여부(기본 true)
    pub new_issues_only: Option<bool>,
    /// 경로 비교 시 대소문자 무시 여부(미지정 시 호스트 관례)
    pub case_insensitive_paths: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["gh","auth","token"])
    pub token_command: Option<Vec<String>>,
    /// API base URL override(선택)
    pub api_base: Option<String>,
}

impl Config {
    pub fn message_limit(&self) -> usize {
        self.defaults.message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.defaults
            .report_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn new_issues_only(&self) -> bool {
        self.defaults.new_issues_only.unwrap_or(true)
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(host)
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);

        for (host, incoming) in other.hosts {
            if let Some(existing) = self.hosts.get_mut(&host) {
                existing.merge_from(incoming);
            } else {
                self.hosts.insert(host, incoming);
            }
        }
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.message_limit.is_some() {
            self.message_limit = other.message_limit;
        }
        if other.report_path.is_some() {
            self.report_path = other.report_path;
        }
        if other.new_issues_only.is_some() {
            self.new_issues_only = other.new_issues_only;
        }
        if other.case_insensitive_paths.is_some() {
            self.case_insensitive_paths = other.case_insensitive_paths;
        }
    }
}

impl HostConfig {
    pub fn merge_from(&mut self, other: HostConfig) {
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
    }
}
