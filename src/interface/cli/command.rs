//! CLI 명령 파싱 모듈.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::sync::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "sonar-prca")]
#[command(about = "Sync SonarQube findings into GitHub PR / GitLab MR comment threads")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PR/MR URL
    url: Option<String>,

    /// SonarQube issues report (sonar-report.json)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Maximum number of findings to post (default 100)
    #[arg(long, value_name = "N")]
    message_limit: Option<usize>,

    /// Directory that relative report/PR paths are resolved against (default: current dir)
    #[arg(long, value_name = "DIR")]
    workspace_root: Option<PathBuf>,

    /// Compare file paths case-insensitively (`=false` forces case-sensitive; default: host convention)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    case_insensitive_paths: Option<bool>,

    /// Print the findings that would be posted, do not touch comments
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show effective merged config and token sources
    Config,
}

pub enum CliAction {
    InspectConfig,
    Sync(RunOptions),
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Cli::parse().into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        if let Some(Commands::Config) = self.command {
            return Ok(CliAction::InspectConfig);
        }

        let Some(url) = self.url else {
            return Err("missing pull request URL (see --help)".to_string());
        };

        Ok(CliAction::Sync(RunOptions {
            url,
            report_path: self.report,
            message_limit: self.message_limit,
            workspace_root: self.workspace_root,
            case_insensitive_paths: self.case_insensitive_paths,
            dry_run: self.dry_run,
        }))
    }
}
