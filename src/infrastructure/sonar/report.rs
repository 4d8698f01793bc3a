//! SonarQube issues report(`sonar-report.json`) JSON 스키마.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct SonarReport {
    #[serde(default)]
    pub issues: Vec<SonarIssue>,
    #[serde(default)]
    pub components: Vec<SonarComponent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SonarIssue {
    pub component: String,
    pub line: Option<u32>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: String,
    pub rule: Option<String>,
    pub is_new: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SonarComponent {
    pub key: String,
    pub path: Option<String>,
}
