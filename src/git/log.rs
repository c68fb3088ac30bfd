use crate::error::{LogstatError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Arguments that produce the format the parser understands.
pub const GIT_LOG_ARGS: &[&str] = &[
    "--no-pager",
    "log",
    "--numstat",
    "--date=iso-strict",
    "--no-decorate",
    "--no-color",
];

/// Where the `git log --numstat` text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Stdin,
    File(PathBuf),
    Repo(PathBuf),
}

impl LogSource {
    /// A repository wins over an input file; `-` or no file means stdin.
    pub fn from_args(input: Option<&Path>, repo: Option<&Path>) -> Self {
        match (input, repo) {
            (_, Some(repo)) => LogSource::Repo(repo.to_path_buf()),
            (Some(path), None) if path != Path::new("-") => LogSource::File(path.to_path_buf()),
            _ => LogSource::Stdin,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LogSource::Stdin => "stdin".to_string(),
            LogSource::File(path) => path.display().to_string(),
            LogSource::Repo(path) => format!("git log in {}", path.display()),
        }
    }

    pub fn read(&self, show_progress: bool) -> Result<String> {
        match self {
            LogSource::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes)?;
                Ok(decode(bytes))
            }
            LogSource::File(path) => Ok(decode(std::fs::read(path)?)),
            LogSource::Repo(path) => run_git_log(path, show_progress),
        }
    }
}

fn run_git_log(repo: &Path, show_progress: bool) -> Result<String> {
    if !repo.is_dir() {
        return Err(LogstatError::Git(format!("'{}' is not a directory", repo.display())));
    }

    let pb = if show_progress {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Running git log...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    debug!(repo = %repo.display(), "running git log");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(GIT_LOG_ARGS)
        .output()
        .map_err(|e| LogstatError::Git(format!("failed to run git: {e}")));
    pb.finish_and_clear();
    let output = output?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LogstatError::Git(format!(
            "git log failed in '{}': {}",
            repo.display(),
            stderr.trim()
        )));
    }

    Ok(decode(output.stdout))
}

/// Invalid UTF-8 (e.g. Latin-1 author names) becomes U+FFFD rather than an error.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
