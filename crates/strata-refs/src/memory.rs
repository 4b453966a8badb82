//! In-memory reference store.
//!
//! [`InMemoryRefStore`] keeps all refs in a `HashMap` behind a `RwLock`.
//! Suitable for tests and ephemeral repositories; data is lost on drop.

use std::collections::HashMap;
use std::sync::RwLock;

use strata_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, RefResult};
use crate::names::{validate_branch_name, validate_tag_name};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

/// An in-memory implementation of [`RefStore`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, Ref>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> RefResult<Option<Ref>> {
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs.get(name).cloned())
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> RefResult<()> {
        match reference {
            Ref::Branch { name: bname, .. } => validate_branch_name(bname)?,
            Ref::Tag { name: tname, .. } => validate_tag_name(tname)?,
            // Transaction refs use fixed internal names; no validation.
            Ref::Transaction { .. } => {}
        }

        let mut refs = self.refs.write().expect("lock poisoned");

        if reference.is_tag() {
            if let Some(existing) = refs.get(name) {
                if existing.is_tag() {
                    return Err(RefError::TagImmutable {
                        name: name.to_string(),
                    });
                }
            }
        }

        debug!(name, target = %reference.target().short_hex(), "ref updated");
        refs.insert(name.to_string(), reference.clone());
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> RefResult<bool> {
        {
            let head = self.head.read().expect("lock poisoned");
            if let Some(Head::Symbolic(current)) = head.as_ref() {
                if name == format!("refs/heads/{current}") {
                    return Err(RefError::DeleteCurrentBranch {
                        name: current.clone(),
                    });
                }
            }
        }
        let mut refs = self.refs.write().expect("lock poisoned");
        Ok(refs.remove(name).is_some())
    }

    fn list_refs(&self, prefix: &str) -> RefResult<Vec<(String, Ref)>> {
        let refs = self.refs.read().expect("lock poisoned");
        let mut result: Vec<(String, Ref)> = refs
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, r)| (name.clone(), r.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    fn head(&self) -> RefResult<Option<Head>> {
        Ok(self.head.read().expect("lock poisoned").clone())
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        validate_branch_name(branch)?;
        *self.head.write().expect("lock poisoned") = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, commit: ObjectId) -> RefResult<()> {
        *self.head.write().expect("lock poisoned") = Some(Head::Detached(commit));
        Ok(())
    }
}
