//! SonarQube 리포트 파싱 구현.

mod report;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::ReportProcessor;
use crate::domain::finding::{Finding, Severity};

use report::{SonarIssue, SonarReport};

/// `sonar-report.json`을 읽어 finding 목록으로 변환한다.
pub struct SonarReportProcessor {
    new_issues_only: bool,
}

impl SonarReportProcessor {
    pub fn new(new_issues_only: bool) -> Self {
        Self { new_issues_only }
    }

    /// 리포트 본문을 파싱한다. 이슈 순서는 리포트 순서를 유지한다.
    pub fn parse_report(&self, raw: &str) -> Result<Vec<Finding>> {
        let report: SonarReport =
            serde_json::from_str(raw).context("invalid SonarQube report JSON")?;

        let paths: HashMap<&str, &str> = report
            .components
            .iter()
            .filter_map(|c| c.path.as_deref().map(|path| (c.key.as_str(), path)))
            .collect();

        let total = report.issues.len();
        let findings: Vec<Finding> = report
            .issues
            .iter()
            .filter(|issue| !self.new_issues_only || issue.is_new.unwrap_or(true))
            .map(|issue| to_finding(issue, &paths))
            .collect();

        debug!("{} of {} report issues kept", findings.len(), total);
        Ok(findings)
    }
}

impl ReportProcessor for SonarReportProcessor {
    fn fetch_findings(&self, report_path: &Path) -> Result<Vec<Finding>> {
        let raw = fs::read_to_string(report_path).with_context(|| {
            format!("failed to read SonarQube report at {}", report_path.display())
        })?;
        self.parse_report(&raw)
            .with_context(|| format!("failed to parse {}", report_path.display()))
    }
}

fn to_finding(issue: &SonarIssue, paths: &HashMap<&str, &str>) -> Finding {
    let severity = Severity::from_report(&issue.severity);
    let mut finding = Finding::new(
        component_file(&issue.component, paths),
        severity,
        issue.message.trim(),
    );
    finding.line = issue.line;
    finding.rule = issue.rule.clone();
    finding
}

/// 컴포넌트 목록의 path, 없으면 `projectKey:path` 키의 마지막 `:` 뒤 부분.
fn component_file(component: &str, paths: &HashMap<&str, &str>) -> String {
    if let Some(path) = paths.get(component) {
        return (*path).to_string();
    }
    match component.rsplit_once(':') {
        Some((_, path)) if !path.is_empty() => path.to_string(),
        _ => component.to_string(),
    }
}
