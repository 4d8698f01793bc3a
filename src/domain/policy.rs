//! 도메인 정책(게시 대상 선별 규칙, 분석 코멘트 식별 규칙).

use crate::domain::finding::Finding;
use crate::domain::path::PathMatcher;

pub const DEFAULT_MESSAGE_LIMIT: usize = 100;

/// 이 도구가 게시한 코멘트 스레드를 식별하는 마커.
pub const ANALYSIS_THREAD_MARKER: &str = "<!-- sonar-prca -->";

pub fn is_analysis_thread(body: &str) -> bool {
    body.contains(ANALYSIS_THREAD_MARKER)
}

/// 변경 파일 중 하나와 같은 파일에 속한 finding만 남긴다.
/// 남은 finding의 `file`은 PR 쪽 경로로 바꿔 코멘트 위치로 그대로 쓸 수 있게 한다.
pub fn retain_relevant(
    findings: &mut Vec<Finding>,
    changed_files: &[String],
    matcher: &PathMatcher,
) {
    findings.retain_mut(|finding| {
        match changed_files
            .iter()
            .find(|changed| matcher.same_file(changed, &finding.file))
        {
            Some(changed) => {
                finding.file = changed.clone();
                true
            }
            None => false,
        }
    });
}

/// 우선순위 내림차순 안정 정렬. 동순위는 파서 출력 순서를 유지한다.
pub fn sort_by_priority(findings: &mut [Finding]) {
    findings.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// 상한을 넘는 finding 개수.
pub fn overflow_count(len: usize, limit: usize) -> usize {
    len.saturating_sub(limit)
}
