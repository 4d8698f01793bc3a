//! 적용 설정 진단(inspection) 뷰 모델.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_host_token;
use crate::application::config::{DefaultsConfig, HostConfig};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub hosts: BTreeMap<String, HostInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub message_limit: usize,
    pub report_path: Option<String>,
    pub new_issues_only: bool,
    pub case_insensitive_paths: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInspection {
    pub token_source: Option<String>,
    pub token_resolved: bool,
    pub api_base: Option<String>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;
        let hosts = config
            .hosts
            .iter()
            .map(|(host, cfg)| (host.clone(), host_inspection(cfg)))
            .collect();

        Self {
            searched_paths: display_all(&loaded.searched_paths),
            loaded_paths: display_all(&loaded.loaded_paths),
            defaults: config.defaults.clone(),
            effective_defaults: EffectiveDefaults {
                message_limit: config.message_limit(),
                report_path: config.report_path().map(|p| p.display().to_string()),
                new_issues_only: config.new_issues_only(),
                case_insensitive_paths: config.defaults.case_insensitive_paths,
            },
            hosts,
        }
    }
}

fn display_all(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

fn host_inspection(cfg: &HostConfig) -> HostInspection {
    let resolution = resolve_host_token(Some(cfg)).ok();
    HostInspection {
        token_source: resolution.as_ref().and_then(|r| r.source.clone()),
        token_resolved: resolution.as_ref().is_some_and(|r| r.token.is_some()),
        api_base: cfg.api_base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::config::Config;

    #[test]
    fn inspection_reports_effective_values_without_leaking_tokens() {
        let mut config = Config::default();
        config.defaults.message_limit = Some(20);
        config.hosts.insert(
            "github.com".to_string(),
            HostConfig {
                token: Some("secret".to_string()),
                ..Default::default()
            },
        );
        let loaded = LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
            loaded_paths: vec![PathBuf::from("b.json")],
        };

        let inspection = ConfigInspection::from_loaded(loaded);

        assert_eq!(inspection.effective_defaults.message_limit, 20);
        assert!(inspection.effective_defaults.new_issues_only);
        assert_eq!(inspection.loaded_paths, vec!["b.json"]);
        let github = &inspection.hosts["github.com"];
        assert!(github.token_resolved);
        assert_eq!(github.token_source.as_deref(), Some("inline"));

        let json = serde_json::to_string(&inspection.effective_defaults).unwrap();
        assert!(!json.contains("secret"));
    }
}
