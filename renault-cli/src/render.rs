//! Terminal rendering of repository status and sync outcomes.

use colored::Colorize;

use renault_sync::{OutcomeKind, RepoStatus, SyncOutcome, SyncReport};

const MODIFIED_GLYPH: &str = "Δ";
const DIRTY_GLYPH: &str = "✘";
const CLEAN_GLYPH: &str = "✔";
const UNTRACKED_GLYPH: &str = "?";
const UNMERGED_GLYPH: &str = "‼";
const AHEAD_ARROW: &str = "↑";
const BEHIND_ARROW: &str = "↓";
const NEW_PULL_GLYPH: &str = "🔥";

/// One-line status: branch, tag, ahead/behind badges, then change glyphs.
pub fn status_line(status: &RepoStatus) -> String {
    let mut line = String::new();
    line.push_str(&status.branch.blue().to_string());
    line.push(' ');

    if let Some(tag) = status.tag.name() {
        line.push_str(&tag.yellow().to_string());
        line.push(' ');
    }

    if status.ahead > 0 {
        let badge = format!(" {AHEAD_ARROW}{} ", status.ahead);
        line.push_str(&badge.black().on_yellow().to_string());
    }
    if status.behind > 0 {
        let badge = format!(" {BEHIND_ARROW}{} ", status.behind);
        line.push_str(&badge.white().on_red().to_string());
    }
    if status.ahead > 0 || status.behind > 0 {
        line.push(' ');
    }

    if status.untracked > 0 {
        line.push_str(&UNTRACKED_GLYPH.strikethrough().to_string());
        line.push(' ');
    }
    if status.has_unmerged_conflicts() {
        line.push_str(&UNMERGED_GLYPH.cyan().to_string());
        line.push(' ');
    }
    if status.has_unstaged_changes() {
        line.push_str(&MODIFIED_GLYPH.red().to_string());
        line.push(' ');
    }

    if status.is_dirty() {
        line.push_str(&DIRTY_GLYPH.red().to_string());
    } else {
        line.push_str(&CLEAN_GLYPH.green().to_string());
    }

    if status.new_pull {
        line.push(' ');
        line.push_str(&NEW_PULL_GLYPH.red().to_string());
    }
    line
}

/// Summary line, indented raw git output, then warnings.
pub fn outcome_lines(outcome: &SyncOutcome) -> Vec<String> {
    let prefix = format!("[{}]", outcome.project).bold();
    let label = match outcome.kind {
        kind if kind.is_failure() => kind.label().red(),
        OutcomeKind::PullSkipped => outcome.kind.label().yellow(),
        kind => kind.label().green(),
    };

    let mut summary = format!("{prefix} {label}");
    if let Some(detail) = &outcome.detail {
        if outcome.kind.is_failure() {
            summary.push_str(&format!(": {detail}"));
        } else {
            summary.push_str(&format!(" ({detail})"));
        }
    }
    if let Some(status) = &outcome.status {
        summary.push_str("  ");
        summary.push_str(&status_line(status));
    }

    let mut lines = vec![summary];
    lines.extend(outcome.output.lines().map(|l| format!("    {l}")));
    lines.extend(
        outcome
            .warnings
            .iter()
            .map(|w| format!("{prefix} {} {w}", "warning:".yellow())),
    );
    lines
}

pub fn tally_line(report: &SyncReport) -> String {
    format!(
        "Workspace synchronization completed: {} cloned, {} pulled, {} up-to-date, {} skipped, {} failed.",
        report.count(OutcomeKind::Cloned),
        report.count(OutcomeKind::Pulled),
        report.count(OutcomeKind::UpToDate),
        report.count(OutcomeKind::PullSkipped),
        report.failures(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use renault_core::ProjectName;
    use renault_sync::{ChangeTally, TagLookup};

    fn plain() {
        colored::control::set_override(false);
    }

    fn main_branch() -> RepoStatus {
        RepoStatus {
            branch: "main".into(),
            ..RepoStatus::default()
        }
    }

    #[test]
    fn clean_status_is_branch_and_check() {
        plain();
        assert_eq!(status_line(&main_branch()), "main ✔");
    }

    #[test]
    fn ahead_behind_badges() {
        plain();
        let status = RepoStatus {
            ahead: 2,
            behind: 1,
            ..main_branch()
        };
        assert_eq!(status_line(&status), "main  ↑2  ↓1  ✔");
    }

    #[test]
    fn every_glyph_in_order() {
        plain();
        let status = RepoStatus {
            tag: TagLookup::Tagged("v0.3.1".into()),
            untracked: 1,
            unmerged: 1,
            staged: ChangeTally {
                added: 1,
                ..ChangeTally::default()
            },
            unstaged: ChangeTally {
                modified: 1,
                ..ChangeTally::default()
            },
            new_pull: true,
            ..main_branch()
        };
        assert_eq!(status_line(&status), "main v0.3.1 ? ‼ Δ ✘ 🔥");
    }

    #[test]
    fn failure_line_carries_detail() {
        plain();
        let outcome = SyncOutcome {
            project: ProjectName::from("api"),
            kind: OutcomeKind::PullFailed,
            status: None,
            detail: Some("network down".into()),
            output: String::new(),
            warnings: vec!["remote mismatch".into()],
        };
        assert_eq!(
            outcome_lines(&outcome),
            vec![
                "[api] pull-failed: network down".to_string(),
                "[api] warning: remote mismatch".to_string(),
            ]
        );
    }

    #[test]
    fn pulled_line_indents_git_output() {
        plain();
        let outcome = SyncOutcome {
            project: ProjectName::from("web"),
            kind: OutcomeKind::Pulled,
            status: Some(RepoStatus {
                new_pull: true,
                ..main_branch()
            }),
            detail: None,
            output: "Updating a1..b2\nFast-forward".into(),
            warnings: Vec::new(),
        };
        let lines = outcome_lines(&outcome);
        assert_eq!(lines[0], "[web] pulled  main ✔ 🔥");
        assert_eq!(lines[1], "    Updating a1..b2");
        assert_eq!(lines[2], "    Fast-forward");
    }
}
