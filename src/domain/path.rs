//! 파일 경로 동일성 판정 규칙.
//!
//! 두 경로를 정규화한 뒤 한쪽에서 다른 쪽으로의 상대 경로가 비어 있으면 같은 파일로 본다.
//! 파일시스템에 접근하지 않는 순수 어휘(lexical) 비교다.

use std::path::{Path, PathBuf};

/// 경로 대소문자 비교 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCase {
    Sensitive,
    Insensitive,
}

impl PathCase {
    /// 현재 호스트 파일시스템 관례(Windows/macOS는 대소문자 무시).
    pub fn host() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    /// 설정/CLI 플래그를 정책으로 변환한다. 미지정이면 호스트 관례를 따른다.
    pub fn from_flag(case_insensitive: Option<bool>) -> Self {
        match case_insensitive {
            Some(true) => Self::Insensitive,
            Some(false) => Self::Sensitive,
            None => Self::host(),
        }
    }
}

/// 작업 디렉터리 기준으로 경로 동일성을 판정한다.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    root: Vec<String>,
    case: PathCase,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new("/", PathCase::host())
    }
}

impl PathMatcher {
    /// `root`는 상대 경로를 해석할 기준 디렉터리다.
    pub fn new(root: impl AsRef<Path>, case: PathCase) -> Self {
        let raw = root.as_ref().to_string_lossy();
        let root = resolve_segments(&unify(&raw, case), &[]);
        Self { root, case }
    }

    /// 두 경로가 같은 파일을 가리키면 true.
    pub fn same_file(&self, left: &str, right: &str) -> bool {
        let left = self.normalize(left);
        let right = self.normalize(right);
        pathdiff::diff_paths(&left, &right).is_some_and(|rel| rel.as_os_str().is_empty())
    }

    /// 구분자/대소문자/`.`/`..`를 정리한 절대 경로 형태로 변환한다.
    pub fn normalize(&self, raw: &str) -> PathBuf {
        let segments = resolve_segments(&unify(raw, self.case), &self.root);
        PathBuf::from(format!("/{}", segments.join("/")))
    }
}

fn unify(raw: &str, case: PathCase) -> String {
    let slashed = raw.trim().replace('\\', "/");
    match case {
        PathCase::Sensitive => slashed,
        PathCase::Insensitive => slashed.to_lowercase(),
    }
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    // 드라이브 문자(C:/...)
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn resolve_segments(path: &str, root: &[String]) -> Vec<String> {
    let mut segments: Vec<String> = if is_absolute(path) {
        Vec::new()
    } else {
        root.to_vec()
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}
