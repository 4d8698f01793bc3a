//! 리포트 파서 팩토리 포트 구현 어댑터.

use crate::application::config::Config;
use crate::application::ports::{ReportProcessor, ReportProcessorFactory};
use crate::infrastructure::sonar::SonarReportProcessor;

pub struct SonarReportProcessorFactory;

impl ReportProcessorFactory for SonarReportProcessorFactory {
    fn build(&self, config: &Config) -> Box<dyn ReportProcessor> {
        Box::new(SonarReportProcessor::new(config.new_issues_only()))
    }
}
