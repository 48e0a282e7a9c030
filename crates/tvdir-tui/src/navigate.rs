//! Opening an activated channel with an external program.

use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;

use tvdir_proto::config::PlayerConfig;

/// A resolved launch: run `program args.. url` after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    command: String,
    args: Vec<String>,
    delay: Duration,
}

impl Navigator {
    pub fn from_config(cfg: &PlayerConfig) -> Self {
        Self {
            command: cfg.command.trim().to_string(),
            args: cfg.args.clone(),
            delay: Duration::from_millis(cfg.navigate_delay_ms),
        }
    }

    /// `None` when there is nothing to open or nothing to open it with.
    pub fn plan(&self, url: &str) -> Option<LaunchPlan> {
        if url.is_empty() || self.command.is_empty() {
            return None;
        }
        let mut args = self.args.clone();
        args.push(url.to_string());
        Some(LaunchPlan {
            program: self.command.clone(),
            args,
            delay: self.delay,
        })
    }
}

/// Wait out the plan's delay, then spawn the program detached from the
/// terminal. The child is not awaited.
pub async fn launch(plan: LaunchPlan) -> anyhow::Result<()> {
    tokio::time::sleep(plan.delay).await;
    tracing::info!("opening {:?} with {}", plan.args.last(), plan.program);
    let mut child = tokio::process::Command::new(&plan.program)
        .args(&plan.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("could not start {}", plan.program))?;
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                tracing::warn!("opener exited with {}", status);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("waiting for opener failed: {}", e),
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator(command: &str, args: &[&str]) -> Navigator {
        Navigator::from_config(&PlayerConfig {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            navigate_delay_ms: 200,
        })
    }

    #[test]
    fn plan_appends_url_after_args() {
        let plan = navigator("mpv", &["--fs"]).plan("http://x/espn").unwrap();
        assert_eq!(plan.program, "mpv");
        assert_eq!(plan.args, vec!["--fs", "http://x/espn"]);
        assert_eq!(plan.delay, Duration::from_millis(200));
    }

    #[test]
    fn empty_url_or_command_means_no_navigation() {
        assert!(navigator("mpv", &[]).plan("").is_none());
        assert!(navigator("   ", &[]).plan("http://x").is_none());
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let plan = LaunchPlan {
            program: "tvdir-test-no-such-program".into(),
            args: vec!["http://x".into()],
            delay: Duration::ZERO,
        };
        let err = launch(plan).await.unwrap_err();
        assert!(err.to_string().contains("tvdir-test-no-such-program"));
    }
}
