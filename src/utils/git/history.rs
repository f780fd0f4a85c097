use crate::utils::date::DateTime;
use anyhow::{Context, Result, anyhow, bail};
use gix::{Commit, ObjectId};
use std::path::{Path, PathBuf};

/// Date (`YYYY-MM-DD`, author timezone) of the newest commit that changed `file`.
///
/// Walks history from HEAD and returns the first commit whose blob for the
/// file differs from its first parent's, matching `git log -n 1 -- file`.
pub fn last_commit_date(file: &Path) -> Result<String> {
    let file = file
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", file.display()))?;
    let dir = file
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", file.display()))?;

    let repo = gix::discover(dir)
        .with_context(|| format!("no git repository above {}", dir.display()))?;
    let relative = repo_relative(&repo, &file)?;

    let head = repo.head_commit().context("repository has no HEAD commit")?;
    for info in repo.rev_walk([head.id]).all()? {
        let info = info?;
        let commit = info.object()?;

        let Some(blob) = entry_id(&commit, &relative)? else {
            continue;
        };

        let changed = match info.parent_ids().next() {
            None => true,
            Some(parent) => {
                let parent = parent.object()?.try_into_commit()?;
                entry_id(&parent, &relative)? != Some(blob)
            }
        };

        if changed {
            let time = commit.time()?;
            return Ok(DateTime::from_unix(time.seconds, time.offset).to_date_string());
        }
    }

    bail!("{} is not tracked", relative.display())
}

/// Path of `file` relative to the repository work tree.
fn repo_relative(repo: &gix::Repository, file: &Path) -> Result<PathBuf> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow!("repository has no work tree"))?
        .canonicalize()?;

    file.strip_prefix(&workdir)
        .map(Path::to_path_buf)
        .with_context(|| format!("{} is outside {}", file.display(), workdir.display()))
}

fn entry_id(commit: &Commit<'_>, relative: &Path) -> Result<Option<ObjectId>> {
    let tree = commit.tree()?;
    Ok(tree.lookup_entry_by_path(relative)?.map(|entry| entry.object_id()))
}
