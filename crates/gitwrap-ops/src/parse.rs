//! Parsers for git's porcelain-ish text output.

use crate::error::{GitOpsError, GitOpsResult};
use crate::types::{BranchInfo, BranchesResult, RemoteSpec};

const REMOTE_BRANCH_PREFIX: &str = "remotes/";

/// Parse `git remote -v`.
///
/// Each remote appears once with `(fetch)` and once with `(push)`. Order of
/// first appearance is kept.
pub fn parse_remotes(output: &str) -> GitOpsResult<Vec<RemoteSpec>> {
    let mut remotes: Vec<RemoteSpec> = Vec::new();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let (name, rest) = line.split_once('\t').ok_or_else(|| GitOpsError::Parse {
            message: format!("remote line without a tab: {:?}", line),
        })?;
        let (url, kind) = split_remote_kind(rest).ok_or_else(|| GitOpsError::Parse {
            message: format!("remote line without a (fetch)/(push) marker: {:?}", line),
        })?;

        let existing = remotes.iter_mut().position(|r| r.name == name);
        match (kind, existing) {
            (RemoteUrlKind::Fetch, Some(idx)) => remotes[idx].fetch_url = url.to_string(),
            (RemoteUrlKind::Fetch, None) => remotes.push(RemoteSpec {
                name: name.to_string(),
                fetch_url: url.to_string(),
                push_url: None,
            }),
            (RemoteUrlKind::Push, Some(idx)) => remotes[idx].push_url = Some(url.to_string()),
            (RemoteUrlKind::Push, None) => remotes.push(RemoteSpec {
                name: name.to_string(),
                fetch_url: url.to_string(),
                push_url: Some(url.to_string()),
            }),
        }
    }

    Ok(remotes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoteUrlKind {
    Fetch,
    Push,
}

/// Split `<url> (fetch)` or `<url> (push)`, ignoring anything after the
/// marker (partial clones append ` [<filter>]` to the fetch line).
fn split_remote_kind(rest: &str) -> Option<(&str, RemoteUrlKind)> {
    const FETCH: &str = " (fetch)";
    const PUSH: &str = " (push)";

    let fetch = rest.rfind(FETCH).map(|idx| (idx, RemoteUrlKind::Fetch));
    let push = rest.rfind(PUSH).map(|idx| (idx, RemoteUrlKind::Push));
    let (idx, kind) = match (fetch, push) {
        (Some(f), Some(p)) => {
            if f.0 > p.0 {
                f
            } else {
                p
            }
        }
        (Some(found), None) | (None, Some(found)) => found,
        (None, None) => return None,
    };
    Some((&rest[..idx], kind))
}

/// Parse `git branch -a --no-color`.
///
/// Symbolic entries (`remotes/origin/HEAD -> origin/master`) and a detached
/// HEAD line are skipped.
pub fn parse_branches(output: &str) -> BranchesResult {
    let mut result = BranchesResult::default();

    for line in output.lines() {
        if line.len() < 2 {
            continue;
        }
        let (marker, full) = line.split_at(2);
        let full = full.trim();
        if full.is_empty() || full.contains(" -> ") || full.starts_with('(') {
            continue;
        }

        let is_current = marker.starts_with('*');
        let (remote, name) = match full.strip_prefix(REMOTE_BRANCH_PREFIX) {
            Some(rest) => match rest.split_once('/') {
                Some((remote, name)) => (Some(remote.to_string()), name.to_string()),
                None => (None, rest.to_string()),
            },
            None => (None, full.to_string()),
        };

        if is_current {
            result.current = Some(name.clone());
        }

        result.branches.push(BranchInfo {
            full: full.to_string(),
            name,
            remote,
            is_current,
        });
    }

    result
}

/// Parse `git tag --list`.
pub fn parse_tags(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Pick the commit a tag points at from `git show-ref --dereference` output.
///
/// Annotated tags print the tag object and then a peeled `^{}` line; the
/// peeled line wins.
pub fn parse_tag_commit(output: &str) -> Option<String> {
    let mut first = None;
    for line in output.lines() {
        let Some((sha, refname)) = line.trim().split_once(' ') else {
            continue;
        };
        if refname.ends_with("^{}") {
            return Some(sha.to_string());
        }
        if first.is_none() {
            first = Some(sha.to_string());
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remotes_from_verbose_listing() {
        let output = "origin\t/tmp/bare.git (fetch)\n\
                      origin\t/tmp/bare.git (push)\n\
                      testremote\t../remote (fetch)\n\
                      testremote\tssh://push.example.com/r.git (push)\n";
        let remotes = parse_remotes(output).expect("parse");
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url(), "/tmp/bare.git");
        assert_eq!(remotes[1].name, "testremote");
        assert_eq!(remotes[1].fetch_url, "../remote");
        assert_eq!(
            remotes[1].push_url.as_deref(),
            Some("ssh://push.example.com/r.git")
        );
    }

    #[test]
    fn remote_url_with_spaces() {
        let output = "docs\t/tmp/my repos/docs (fetch)\n";
        let remotes = parse_remotes(output).expect("parse");
        assert_eq!(remotes[0].fetch_url, "/tmp/my repos/docs");
    }

    #[test]
    fn partial_clone_filter_after_fetch_marker() {
        let output = "origin\t/tmp/bare.git (fetch) [blob:none]\n\
                      origin\t/tmp/bare.git (push)\n";
        let remotes = parse_remotes(output).expect("parse");
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].fetch_url, "/tmp/bare.git");
        assert_eq!(remotes[0].push_url.as_deref(), Some("/tmp/bare.git"));
    }

    #[test]
    fn url_containing_a_marker_uses_the_last_one() {
        let output = "odd\t/tmp/a (push) dir (fetch)\n";
        let remotes = parse_remotes(output).expect("parse");
        assert_eq!(remotes[0].fetch_url, "/tmp/a (push) dir");
        assert!(remotes[0].push_url.is_none());
    }

    #[test]
    fn unknown_marker_is_an_error() {
        assert!(matches!(
            parse_remotes("origin\t/tmp/bare.git (mirror)"),
            Err(GitOpsError::Parse { .. })
        ));
    }

    #[test]
    fn malformed_remote_line_is_an_error() {
        assert!(matches!(
            parse_remotes("garbage"),
            Err(GitOpsError::Parse { .. })
        ));
    }

    #[test]
    fn empty_remote_listing() {
        assert!(parse_remotes("").expect("parse").is_empty());
    }

    #[test]
    fn branches_with_remotes() {
        let output = "* master\n  testbranch\n  remotes/origin/HEAD -> origin/master\n  remotes/origin/master\n  remotes/testremote2/feature/x\n";
        let result = parse_branches(output);

        assert_eq!(result.current.as_deref(), Some("master"));
        assert_eq!(result.branches.len(), 4);
        assert!(result.contains_full("remotes/testremote2/feature/x"));

        let nested = result
            .branches
            .iter()
            .find(|b| b.full == "remotes/testremote2/feature/x")
            .expect("nested branch");
        assert_eq!(nested.remote.as_deref(), Some("testremote2"));
        assert_eq!(nested.name, "feature/x");
        assert_eq!(result.local().count(), 2);
    }

    #[test]
    fn detached_head_is_skipped() {
        let output = "* (HEAD detached at 1a2b3c4)\n  master\n";
        let result = parse_branches(output);
        assert!(result.current.is_none());
        assert_eq!(result.branches.len(), 1);
        assert_eq!(result.branches[0].name, "master");
    }

    #[test]
    fn worktree_marker_is_not_current() {
        let output = "+ other-worktree\n* main\n";
        let result = parse_branches(output);
        assert_eq!(result.current.as_deref(), Some("main"));
        assert!(!result.branches[0].is_current);
    }

    #[test]
    fn tags_list() {
        assert_eq!(parse_tags("v1.0\nv1.1\n\n"), vec!["v1.0", "v1.1"]);
    }

    #[test]
    fn tag_commit_prefers_peeled_line() {
        let annotated = "aaaa refs/tags/v1\nbbbb refs/tags/v1^{}\n";
        assert_eq!(parse_tag_commit(annotated).as_deref(), Some("bbbb"));

        let lightweight = "cccc refs/tags/v2\n";
        assert_eq!(parse_tag_commit(lightweight).as_deref(), Some("cccc"));

        assert_eq!(parse_tag_commit(""), None);
    }
}
