//! Infrastructure layer
//! 외부 시스템(VCS API/리포트 파일/설정 파일)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod config;
pub mod render;
pub mod sonar;
pub mod vcs;
