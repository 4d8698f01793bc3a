//! 동기화 실행 옵션 값 객체.

use std::path::PathBuf;

/// CLI/라이브러리 호출에서 넘어오는 실행 옵션.
/// `None` 값은 설정 파일 값(또는 기본값)으로 대체된다.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub url: String,
    pub report_path: Option<PathBuf>,
    pub message_limit: Option<usize>,
    pub workspace_root: Option<PathBuf>,
    pub case_insensitive_paths: Option<bool>,
    pub dry_run: bool,
}
