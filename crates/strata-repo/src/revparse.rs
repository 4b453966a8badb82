//! Refspec resolution: symbolic names to object ids.
//!
//! Supported forms:
//!
//! - `HEAD` — the current head commit
//! - `WORK_HEAD`, `STAGE_HEAD` — the transaction trees
//! - a branch name (`main`) or tag name (`v1.0`)
//! - a full 64-character hex object id
//! - any of the above followed by `:<path>` — resolves the tree behind the
//!   ref (peeling tags and commits) and descends the path, yielding the
//!   entry's id (e.g. `WORK_HEAD:node`, `main:way/101`)

use strata_refs::{RefStore, STAGE_HEAD, WORK_HEAD};
use strata_store::{Commit, ObjectKind, ObjectStore, RevTree, Tag};
use strata_tree::find_path;
use strata_types::ObjectId;

use crate::error::{RepoError, RepoResult};
use crate::repository::Repository;

/// Resolve a refspec to an object id.
///
/// Returns `Ok(None)` when the spec is well-formed but nothing is there
/// (unknown name, unborn branch, missing path). Malformed specs are an
/// error.
pub fn resolve(repo: &Repository, spec: &str) -> RepoResult<Option<ObjectId>> {
    if spec.is_empty() {
        return Err(RepoError::InvalidRefSpec(spec.to_string()));
    }

    if let Some((ref_part, path)) = spec.split_once(':') {
        let Some(base) = resolve_name(repo, ref_part)? else {
            return Ok(None);
        };
        let root = tree_root_of(repo, &base)?;
        let stored = repo.store().get(&root)?;
        let tree = RevTree::from_stored_object(&stored)?;
        return Ok(find_path(repo.store().as_ref(), &tree, path)?.map(|entry| entry.target));
    }

    resolve_name(repo, spec)
}

fn resolve_name(repo: &Repository, name: &str) -> RepoResult<Option<ObjectId>> {
    match name {
        "HEAD" => return repo.head_commit_id(),
        WORK_HEAD => return Ok(Some(repo.work_tree().tree_id()?)),
        STAGE_HEAD => return Ok(Some(repo.staging().tree_id()?)),
        _ => {}
    }

    if let Some(r) = repo.refs().read_ref(&format!("refs/heads/{name}"))? {
        let target = r.target();
        return Ok(if target.is_null() { None } else { Some(target) });
    }
    if let Some(r) = repo.refs().read_ref(&format!("refs/tags/{name}"))? {
        return Ok(Some(r.target()));
    }

    if name.len() == 64 && name.chars().all(|c| c.is_ascii_hexdigit()) {
        let id = ObjectId::from_hex(name)
            .map_err(|_| RepoError::InvalidRefSpec(name.to_string()))?;
        return Ok(if repo.store().exists(&id)? {
            Some(id)
        } else {
            None
        });
    }

    Ok(None)
}

/// Peel an id down to the tree it represents.
fn tree_root_of(repo: &Repository, id: &ObjectId) -> RepoResult<ObjectId> {
    let stored = repo.store().get(id)?;
    match stored.kind {
        ObjectKind::Tree => Ok(*id),
        ObjectKind::Commit => {
            let commit = Commit::from_stored_object(&stored)?;
            Ok(commit.tree)
        }
        ObjectKind::Tag => {
            let tag = Tag::from_stored_object(&stored)?;
            tree_root_of(repo, &tag.target)
        }
        other => Err(RepoError::WrongKind {
            id: *id,
            expected: "tree, commit, or tag",
            actual: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_store::Feature;
    use strata_types::Value;

    fn seeded_repo() -> (Repository, ObjectId) {
        let repo = Repository::init().unwrap();
        repo.work_tree()
            .insert_features(
                "node",
                vec![(
                    "7".to_string(),
                    Feature::new(ObjectId::hash_of(b"schema"), vec![Value::Long(7)]),
                )],
            )
            .unwrap();
        repo.staging().add().unwrap();
        let (commit_id, _) = repo.commit("alice", "seed").unwrap();
        (repo, commit_id)
    }

    #[test]
    fn resolves_head_and_transaction_refs() {
        let (repo, commit_id) = seeded_repo();
        assert_eq!(resolve(&repo, "HEAD").unwrap(), Some(commit_id));
        assert_eq!(
            resolve(&repo, "WORK_HEAD").unwrap(),
            Some(repo.work_tree().tree_id().unwrap())
        );
        assert_eq!(
            resolve(&repo, "STAGE_HEAD").unwrap(),
            Some(repo.staging().tree_id().unwrap())
        );
    }

    #[test]
    fn resolves_branch_names() {
        let (repo, commit_id) = seeded_repo();
        assert_eq!(resolve(&repo, "main").unwrap(), Some(commit_id));
        assert_eq!(resolve(&repo, "no-such-branch").unwrap(), None);
    }

    #[test]
    fn unborn_branch_resolves_to_none() {
        let repo = Repository::init().unwrap();
        assert_eq!(resolve(&repo, "main").unwrap(), None);
        assert_eq!(resolve(&repo, "HEAD").unwrap(), None);
    }

    #[test]
    fn resolves_full_hex_ids() {
        let (repo, commit_id) = seeded_repo();
        assert_eq!(
            resolve(&repo, &commit_id.to_hex()).unwrap(),
            Some(commit_id)
        );
        let absent = ObjectId::hash_of(b"not stored");
        assert_eq!(resolve(&repo, &absent.to_hex()).unwrap(), None);
    }

    #[test]
    fn path_suffix_descends_the_tree() {
        let (repo, _) = seeded_repo();

        let subtree = resolve(&repo, "WORK_HEAD:node").unwrap().unwrap();
        let stored = repo.store().get(&subtree).unwrap();
        assert_eq!(stored.kind, ObjectKind::Tree);

        let feature = resolve(&repo, "WORK_HEAD:node/7").unwrap().unwrap();
        let stored = repo.store().get(&feature).unwrap();
        assert_eq!(stored.kind, ObjectKind::Feature);

        // Commit refs peel to their tree.
        assert_eq!(resolve(&repo, "main:node/7").unwrap(), Some(feature));
        assert_eq!(resolve(&repo, "HEAD:node/7").unwrap(), Some(feature));

        assert_eq!(resolve(&repo, "WORK_HEAD:node/999").unwrap(), None);
        assert_eq!(resolve(&repo, "ghost:node/7").unwrap(), None);
    }

    #[test]
    fn empty_spec_is_malformed() {
        let repo = Repository::init().unwrap();
        assert!(matches!(
            resolve(&repo, "").unwrap_err(),
            RepoError::InvalidRefSpec(_)
        ));
    }
}
