//! VCS 코멘트용 Markdown 렌더링 모듈.

use crate::domain::finding::{Finding, Severity};
use crate::domain::policy::ANALYSIS_THREAD_MARKER;

/// finding 하나를 코멘트 스레드 본문으로 만든다.
/// 다음 실행에서 삭제 대상으로 찾을 수 있도록 마커를 맨 앞에 둔다.
pub fn render_finding_markdown(finding: &Finding) -> String {
    render(finding, finding.line.is_none())
}

/// 라인 위치로 게시하지 못해 파일 단위로 남길 때의 본문. 라인 번호를 본문에 적는다.
pub fn render_file_level_markdown(finding: &Finding) -> String {
    render(finding, true)
}

fn render(finding: &Finding, with_location: bool) -> String {
    let mut out = String::new();
    out.push_str(ANALYSIS_THREAD_MARKER);
    out.push_str("\n\n");
    out.push_str(&format!(
        "{} **SonarQube {}**",
        severity_badge(finding.severity),
        finding.severity.label()
    ));
    if let Some(rule) = &finding.rule {
        out.push_str(&format!(" `{rule}`"));
    }
    out.push_str("\n\n");
    out.push_str(finding.message.trim());
    out.push('\n');

    if with_location {
        match finding.line {
            Some(line) => out.push_str(&format!("\nFile: `{}` line {line}\n", finding.file)),
            None => out.push_str(&format!("\nFile: `{}`\n", finding.file)),
        }
    }
    out
}

fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::Blocker | Severity::Critical => "🔴",
        Severity::Major => "🟠",
        Severity::Minor => "🟡",
        Severity::Info => "🔵",
    }
}
