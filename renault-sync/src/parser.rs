//! `git status --porcelain=v2 --branch` parser.
//!
//! Single forward pass, one record per line, dispatched on the first
//! whitespace-separated token:
//!
//! ```text
//! # branch.oid <commit> | branch.head <name> | branch.upstream <ref> | branch.ab +<ahead> -<behind>
//! 1 <XY> ...            ordinary change
//! 2 <XY> ...            rename or copy
//! u ...                 unmerged
//! ? <path>              untracked
//! ```
//!
//! Anything else, including `!` ignored entries, is skipped. Short records
//! leave fields empty. The only hard failure is a malformed `branch.ab` count.

use crate::error::StatusParseError;
use crate::status::RepoStatus;

pub fn parse_porcelain_v2(raw: &str) -> Result<RepoStatus, StatusParseError> {
    let mut status = RepoStatus::default();
    for (idx, line) in raw.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(kind) = tokens.next() else { continue };
        match kind {
            "#" => parse_header(&mut status, tokens, idx + 1)?,
            "1" | "2" => {
                if let Some(xy) = tokens.next() {
                    record_xy(&mut status, xy);
                }
            }
            "u" => status.unmerged += 1,
            "?" => status.untracked += 1,
            _ => {}
        }
    }
    Ok(status)
}

fn parse_header<'a>(
    status: &mut RepoStatus,
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<(), StatusParseError> {
    let Some(key) = tokens.next() else { return Ok(()) };
    match key {
        "branch.oid" => status.commit = tokens.next().unwrap_or_default().to_string(),
        "branch.head" => status.branch = tokens.next().unwrap_or_default().to_string(),
        "branch.upstream" => status.upstream = tokens.next().unwrap_or_default().to_string(),
        "branch.ab" => {
            for token in tokens {
                parse_ahead_behind(status, token, line)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_ahead_behind(
    status: &mut RepoStatus,
    token: &str,
    line: usize,
) -> Result<(), StatusParseError> {
    let malformed = || StatusParseError::AheadBehind {
        line,
        token: token.to_string(),
    };
    let (slot, digits) = if let Some(digits) = token.strip_prefix('+') {
        (&mut status.ahead, digits)
    } else if let Some(digits) = token.strip_prefix('-') {
        (&mut status.behind, digits)
    } else {
        return Err(malformed());
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    *slot = digits.parse().map_err(|_| malformed())?;
    Ok(())
}

/// X is the index side, Y the worktree side.
fn record_xy(status: &mut RepoStatus, xy: &str) {
    let mut codes = xy.chars();
    if let Some(x) = codes.next() {
        status.staged.record(x);
    }
    if let Some(y) = codes.next() {
        status.unstaged.record(y);
    }
}
