//! 호스트(VCS) 토큰 해석 포트 구현.

use std::env;

use anyhow::Result;

use crate::application::config::HostConfig;
use crate::application::ports::{HostTokenResolution, HostTokenResolver};
use crate::infrastructure::config::resolve_host_token;

/// 설정(token/env/cmd)에 기반해 런타임 토큰을 해석한다.
/// 설정으로 찾지 못하면 CI에서 흔히 쓰는 호스트별 환경변수를 확인한다.
pub struct HostTokenResolverAdapter;

impl HostTokenResolver for HostTokenResolverAdapter {
    fn resolve(&self, host: &str, host_cfg: Option<&HostConfig>) -> Result<HostTokenResolution> {
        let resolution = resolve_host_token(host_cfg)?;
        if resolution.token.is_some() {
            return Ok(resolution);
        }

        for name in fallback_env_names(host) {
            if let Some(token) = env::var(name).ok().filter(|v| !v.trim().is_empty()) {
                return Ok(HostTokenResolution {
                    token: Some(token.trim().to_string()),
                    source: Some(format!("env:{name}")),
                });
            }
        }
        Ok(resolution)
    }
}

fn fallback_env_names(host: &str) -> &'static [&'static str] {
    if host == "github.com" || host.contains("github") {
        &["GITHUB_TOKEN", "GH_TOKEN"]
    } else if host.contains("gitlab") {
        &["GITLAB_TOKEN"]
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_follow_host() {
        assert_eq!(fallback_env_names("github.com"), ["GITHUB_TOKEN", "GH_TOKEN"]);
        assert_eq!(fallback_env_names("github.corp.example"), ["GITHUB_TOKEN", "GH_TOKEN"]);
        assert_eq!(fallback_env_names("gitlab.example.org"), ["GITLAB_TOKEN"]);
        assert!(fallback_env_names("bitbucket.org").is_empty());
    }

    #[test]
    fn configured_token_is_returned_unchanged() {
        let cfg = HostConfig {
            token: Some("inline-token".to_string()),
            ..Default::default()
        };
        let resolution = HostTokenResolverAdapter
            .resolve("github.com", Some(&cfg))
            .unwrap();
        assert_eq!(resolution.token.as_deref(), Some("inline-token"));
        assert_eq!(resolution.source.as_deref(), Some("inline"));
    }
}
