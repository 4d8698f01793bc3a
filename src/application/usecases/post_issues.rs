//! 분석 리포트의 finding을 PR 코멘트 스레드로 교체 게시하는 핵심 유스케이스.

use std::path::Path;

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::application::ports::{PrCommentService, ReportProcessor};
use crate::domain::finding::Finding;
use crate::domain::path::PathMatcher;
use crate::domain::policy::{
    DEFAULT_MESSAGE_LIMIT, overflow_count, retain_relevant, sort_by_priority,
};

#[derive(Debug, Error)]
pub enum PostIssuesError {
    #[error(
        "SonarQube report path is missing; run the SonarQube analysis step before posting issues"
    )]
    MissingReportPath,
}

/// 리포트 파싱, 변경 파일 조회, 선별, 기존 스레드 삭제, 새 스레드 생성을 순서대로 수행한다.
///
/// 각 원격 호출은 앞 단계가 성공해야만 실행되며, 실패는 감싸지 않고 그대로 반환한다.
/// 동시에 여러 번 실행하지 않는다(파이프라인 실행당 1회).
pub struct PostIssuesUseCase<'a> {
    report_processor: &'a dyn ReportProcessor,
    comment_service: &'a dyn PrCommentService,
    message_limit: usize,
    matcher: PathMatcher,
}

impl<'a> PostIssuesUseCase<'a> {
    /// `message_limit`이 `None`이면 기본 상한(100)을 사용한다.
    pub fn new(
        report_processor: &'a dyn ReportProcessor,
        comment_service: &'a dyn PrCommentService,
        message_limit: Option<usize>,
    ) -> Self {
        Self {
            report_processor,
            comment_service,
            message_limit: message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
            matcher: PathMatcher::default(),
        }
    }

    /// 경로 비교 기준(작업 디렉터리/대소문자 정책)을 지정한다.
    pub fn with_path_matcher(mut self, matcher: PathMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn message_limit(&self) -> usize {
        self.message_limit
    }

    pub async fn post_issues_to_pull_request(&self, report_path: Option<&Path>) -> Result<()> {
        let report_path = report_path.ok_or(PostIssuesError::MissingReportPath)?;

        let all_findings = self.report_processor.fetch_findings(report_path)?;
        debug!("{} findings read from {}", all_findings.len(), report_path.display());

        let changed_files = self.comment_service.changed_files().await?;
        debug!("{} changed files in the pull request", changed_files.len());

        let selection = self.filter(&changed_files, all_findings);

        self.comment_service.delete_analysis_threads().await?;
        debug!("previous analysis threads deleted");

        self.comment_service.create_threads(&selection).await?;
        debug!("{} analysis threads created", selection.len());
        Ok(())
    }

    /// 변경 파일에 속한 finding만 남기고, 우선순위 내림차순으로 정렬한 뒤 상한까지 자른다.
    pub fn filter(&self, changed_files: &[String], mut findings: Vec<Finding>) -> Vec<Finding> {
        retain_relevant(&mut findings, changed_files, &self.matcher);
        debug!("{} messages are relevant to changed files", findings.len());

        sort_by_priority(&mut findings);

        let overflow = overflow_count(findings.len(), self.message_limit);
        if overflow > 0 {
            debug!(
                "{overflow} messages exceed the limit of {} and will not be posted",
                self.message_limit
            );
        }
        findings.truncate(self.message_limit);
        findings
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::domain::finding::Severity;
    use crate::domain::path::PathCase;

    #[derive(Default)]
    struct FakeReport {
        findings: Vec<Finding>,
        fail: bool,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl ReportProcessor for FakeReport {
        fn fetch_findings(&self, report_path: &Path) -> Result<Vec<Finding>> {
            self.calls.lock().unwrap().push(report_path.to_path_buf());
            if self.fail {
                return Err(anyhow!("malformed report"));
            }
            Ok(self.findings.clone())
        }
    }

    #[derive(Default)]
    struct FakeService {
        changed: Vec<String>,
        fail_changed: bool,
        fail_delete: bool,
        calls: Mutex<Vec<&'static str>>,
        created: Mutex<Vec<Finding>>,
    }

    #[async_trait]
    impl PrCommentService for FakeService {
        async fn changed_files(&self) -> Result<Vec<String>> {
            self.calls.lock().unwrap().push("changed_files");
            if self.fail_changed {
                return Err(anyhow!("401 unauthorized"));
            }
            Ok(self.changed.clone())
        }

        async fn delete_analysis_threads(&self) -> Result<()> {
            self.calls.lock().unwrap().push("delete");
            if self.fail_delete {
                return Err(anyhow!("delete failed"));
            }
            Ok(())
        }

        async fn create_threads(&self, findings: &[Finding]) -> Result<()> {
            self.calls.lock().unwrap().push("create");
            self.created.lock().unwrap().extend_from_slice(findings);
            Ok(())
        }
    }

    fn changed(files: &[&str]) -> Vec<String> {
        files.iter().map(|f| f.to_string()).collect()
    }

    fn finding(file: &str, priority: u32, message: &str) -> Finding {
        Finding::new(file, Severity::Major, message).with_priority(priority)
    }

    fn use_case<'a>(
        report: &'a FakeReport,
        service: &'a FakeService,
        limit: Option<usize>,
    ) -> PostIssuesUseCase<'a> {
        PostIssuesUseCase::new(report, service, limit)
            .with_path_matcher(PathMatcher::new("/repo", PathCase::Insensitive))
    }

    #[test]
    fn filter_keeps_relevant_findings_in_priority_order() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, Some(10));

        let findings = vec![
            finding("a.ts", 2, "a"),
            finding("d.ts", 4, "d"),
            finding("b.ts", 5, "b"),
            finding("e.ts", 1, "e"),
            finding("d.ts", 3, "d2"),
        ];
        let selected = uc.filter(&changed(&["a.ts", "b.ts", "c.ts"]), findings);

        assert_eq!(
            selected,
            vec![finding("b.ts", 5, "b"), finding("a.ts", 2, "a")]
        );
    }

    #[test]
    fn filter_caps_to_highest_priorities_and_stays_stable() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, Some(100));

        let findings: Vec<Finding> = (0..150)
            .map(|i| finding("src/a.ts", (i % 3) as u32, &format!("m{i}")))
            .collect();
        let selected = uc.filter(&changed(&["src/a.ts"]), findings.clone());

        assert_eq!(selected.len(), 100);
        assert!(selected.windows(2).all(|w| w[0].priority >= w[1].priority));

        let mut expected = findings;
        expected.sort_by(|a, b| b.priority.cmp(&a.priority));
        expected.truncate(100);
        assert_eq!(selected, expected);
        // priority 2 x50, then priority 1 in input order
        assert_eq!(selected[0].message, "m2");
        assert_eq!(selected[50].message, "m1");
        assert_eq!(selected[51].message, "m4");
    }

    #[test]
    fn filter_returns_everything_relevant_below_the_limit() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, Some(5));

        let findings = vec![
            finding("Src\\A.ts", 1, "windows path"),
            finding("/repo/src/b.ts", 1, "absolute"),
            finding("src/c.ts", 9, "untouched"),
        ];
        let selected = uc.filter(&changed(&["src/a.ts", "src/b.ts"]), findings);

        let messages: Vec<&str> = selected.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, ["windows path", "absolute"]);
    }

    #[tokio::test]
    async fn threads_are_created_under_the_pull_request_path() {
        let report = FakeReport {
            findings: vec![
                finding("/repo/src/a.ts", 2, "absolute"),
                finding("SRC\\A.TS", 1, "case variant"),
            ],
            ..Default::default()
        };
        let service = FakeService {
            changed: changed(&["src/a.ts"]),
            ..Default::default()
        };
        let uc = use_case(&report, &service, None);

        uc.post_issues_to_pull_request(Some(Path::new("r.json")))
            .await
            .unwrap();

        let created = service.created.lock().unwrap();
        let files: Vec<&str> = created.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(files, ["src/a.ts", "src/a.ts"]);
    }

    #[test]
    fn filter_handles_empty_inputs() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, None);

        assert!(uc.filter(&[], vec![finding("a.ts", 1, "a")]).is_empty());
        assert!(uc.filter(&changed(&["a.ts"]), Vec::new()).is_empty());
    }

    #[test]
    fn zero_limit_selects_nothing() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, Some(0));

        assert!(uc.filter(&changed(&["a.ts"]), vec![finding("a.ts", 1, "a")]).is_empty());
    }

    #[test]
    fn message_limit_defaults_to_one_hundred() {
        let report = FakeReport::default();
        let service = FakeService::default();
        assert_eq!(PostIssuesUseCase::new(&report, &service, None).message_limit(), 100);
        assert_eq!(PostIssuesUseCase::new(&report, &service, Some(7)).message_limit(), 7);
    }

    #[tokio::test]
    async fn missing_report_path_fails_before_any_call() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, None);

        let err = uc.post_issues_to_pull_request(None).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PostIssuesError>(),
            Some(PostIssuesError::MissingReportPath)
        ));
        assert!(report.calls.lock().unwrap().is_empty());
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn runs_steps_in_order_and_posts_selection() {
        let report = FakeReport {
            findings: vec![
                finding("a.ts", 1, "low"),
                finding("z.ts", 9, "other file"),
                finding("a.ts", 3, "high"),
            ],
            ..Default::default()
        };
        let service = FakeService {
            changed: changed(&["a.ts"]),
            ..Default::default()
        };
        let uc = use_case(&report, &service, None);

        uc.post_issues_to_pull_request(Some(Path::new("sonar-report.json")))
            .await
            .unwrap();

        assert_eq!(
            *report.calls.lock().unwrap(),
            vec![PathBuf::from("sonar-report.json")]
        );
        assert_eq!(
            *service.calls.lock().unwrap(),
            vec!["changed_files", "delete", "create"]
        );
        let created = service.created.lock().unwrap();
        let messages: Vec<&str> = created.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, ["high", "low"]);
    }

    #[tokio::test]
    async fn empty_selection_still_replaces_threads() {
        let report = FakeReport::default();
        let service = FakeService::default();
        let uc = use_case(&report, &service, None);

        uc.post_issues_to_pull_request(Some(Path::new("r.json")))
            .await
            .unwrap();

        assert_eq!(
            *service.calls.lock().unwrap(),
            vec!["changed_files", "delete", "create"]
        );
        assert!(service.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_failure_prevents_create() {
        let report = FakeReport {
            findings: vec![finding("a.ts", 1, "a")],
            ..Default::default()
        };
        let service = FakeService {
            changed: changed(&["a.ts"]),
            fail_delete: true,
            ..Default::default()
        };
        let uc = use_case(&report, &service, None);

        let err = uc
            .post_issues_to_pull_request(Some(Path::new("r.json")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "delete failed");
        assert_eq!(*service.calls.lock().unwrap(), vec!["changed_files", "delete"]);
        assert!(service.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_error_propagates_without_remote_calls() {
        let report = FakeReport {
            fail: true,
            ..Default::default()
        };
        let service = FakeService::default();
        let uc = use_case(&report, &service, None);

        let err = uc
            .post_issues_to_pull_request(Some(Path::new("r.json")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "malformed report");
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn changed_files_failure_stops_the_run() {
        let report = FakeReport::default();
        let service = FakeService {
            fail_changed: true,
            ..Default::default()
        };
        let uc = use_case(&report, &service, None);

        let err = uc
            .post_issues_to_pull_request(Some(Path::new("r.json")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "401 unauthorized");
        assert_eq!(*service.calls.lock().unwrap(), vec!["changed_files"]);
    }
}
