//! 정적 분석 결과(finding) 엔티티/값 객체.

/// SonarQube 심각도. 선언 순서가 곧 중요도 순서다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    /// 리포트 문자열을 심각도로 변환한다.
    /// 대소문자를 구분하지 않으며, 알 수 없는 값은 `Info`로 취급한다.
    pub fn from_report(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BLOCKER" => Self::Blocker,
            "CRITICAL" => Self::Critical,
            "MAJOR" => Self::Major,
            "MINOR" => Self::Minor,
            _ => Self::Info,
        }
    }

    /// 정렬용 기본 우선순위(클수록 먼저 게시된다).
    pub fn rank(self) -> u32 {
        match self {
            Self::Info => 1,
            Self::Minor => 2,
            Self::Major => 3,
            Self::Critical => 4,
            Self::Blocker => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
            Self::Blocker => "Blocker",
        }
    }
}

/// 리포트 파서가 만든 단일 이슈.
/// 오케스트레이터는 finding을 수정하지 않고 컬렉션의 순서/구성만 바꾼다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// 분석 도구가 보고한 파일 경로(구분자/대소문자 표기는 도구 관례를 따른다)
    pub file: String,
    /// 게시 우선순위(클수록 먼저)
    pub priority: u32,
    pub severity: Severity,
    pub line: Option<u32>,
    pub message: String,
    pub rule: Option<String>,
}

impl Finding {
    /// 심각도 기본 우선순위로 finding을 생성한다.
    pub fn new(file: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            priority: severity.rank(),
            severity,
            line: None,
            message: message.into(),
            rule: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}
