//! dry-run 모드용 코멘트 서비스 래퍼.
//! 변경 파일 조회는 실제 VCS를 사용하고, 삭제/생성은 콘솔 출력으로 대체한다.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::ports::{PrCommentService, Reporter};
use crate::domain::finding::Finding;

pub(super) struct PreviewCommentService<'a> {
    inner: &'a dyn PrCommentService,
    reporter: &'a dyn Reporter,
}

impl<'a> PreviewCommentService<'a> {
    pub(super) fn new(inner: &'a dyn PrCommentService, reporter: &'a dyn Reporter) -> Self {
        Self { inner, reporter }
    }
}

#[async_trait]
impl PrCommentService for PreviewCommentService<'_> {
    async fn changed_files(&self) -> Result<Vec<String>> {
        self.inner.changed_files().await
    }

    async fn delete_analysis_threads(&self) -> Result<()> {
        self.reporter
            .status("Dry Run", "existing analysis threads would be deleted");
        Ok(())
    }

    async fn create_threads(&self, findings: &[Finding]) -> Result<()> {
        self.reporter.section("Dry Run: Analysis Threads");
        if findings.is_empty() {
            self.reporter.raw("(no findings in changed files)");
            return Ok(());
        }
        for finding in findings {
            self.reporter.raw(&preview_line(finding));
        }
        Ok(())
    }
}

fn preview_line(finding: &Finding) -> String {
    let location = match finding.line {
        Some(line) => format!("{}:{}", finding.file, line),
        None => finding.file.clone(),
    };
    match &finding.rule {
        Some(rule) => format!(
            "[{:<8}] {} {} ({})",
            finding.severity.label(),
            location,
            finding.message,
            rule
        ),
        None => format!(
            "[{:<8}] {} {}",
            finding.severity.label(),
            location,
            finding.message
        ),
    }
}
