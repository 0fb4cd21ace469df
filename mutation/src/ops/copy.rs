//! COPY operation - duplicate a subtree under fresh identifiers.

use arbor_core::{
    Identifier, NameValidator, Path, PropertyValue, WorkspaceName, JCR_MIXIN_TYPES,
    JCR_PRIMARY_TYPE, JCR_UUID,
};
use arbor_store::{Change, NewNode, Repository, StoredNode};
use std::collections::BTreeMap;
use tracing::debug;

use super::{resolve_node, resolve_parent};
use crate::error::{MutationError, MutationResult};

/// Copy the subtree at `src` (in `src_workspace`) to `dst` in `workspace`.
/// `dst` includes the new node's name.
pub fn copy_node(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    src_workspace: &WorkspaceName,
    src: &Path,
    dst: &Path,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    if dst.is_root() {
        return Err(MutationError::RootNode { operation: "copy onto" });
    }
    let src_id = resolve_node(repo, src_workspace, src)?;
    let records = collect_subtree(repo, src_workspace, src_id)?;

    let (parent, name) = resolve_parent(repo, workspace, dst)?;
    validator.assert_valid_qualified_name(name)?;
    if repo.workspace(workspace)?.child_named(parent, name).is_some() {
        return Err(MutationError::item_exists(dst));
    }

    let ids = fresh_identifiers(&records);
    insert_subtree(repo, workspace, parent, name, &records, &ids, changes)?;
    debug!(src = %src, dst = %dst, nodes = records.len(), "copied subtree");
    Ok(())
}

/// Snapshot the subtree rooted at `id`, parents first.
pub(crate) fn collect_subtree(
    repo: &Repository,
    workspace: &WorkspaceName,
    id: Identifier,
) -> MutationResult<Vec<StoredNode>> {
    let ws = repo.workspace(workspace)?;
    Ok(ws
        .subtree(id)
        .into_iter()
        .filter_map(|n| ws.node(n).cloned())
        .collect())
}

/// Map every record to a newly generated identifier.
pub(crate) fn fresh_identifiers(records: &[StoredNode]) -> BTreeMap<Identifier, Identifier> {
    records
        .iter()
        .map(|r| (r.id, Identifier::generate()))
        .collect()
}

/// Insert `records` below `parent`, the first one under `name`.
///
/// `ids` maps source identifiers to destination identifiers. References
/// pointing inside the subtree follow the mapping; `jcr:uuid` is rewritten
/// to the destination identifier.
pub(crate) fn insert_subtree(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    parent: Identifier,
    name: &str,
    records: &[StoredNode],
    ids: &BTreeMap<Identifier, Identifier>,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    for (i, record) in records.iter().enumerate() {
        let id = ids.get(&record.id).copied().unwrap_or(record.id);
        let (node_parent, node_name) = if i == 0 {
            (parent, name)
        } else {
            let p = record.parent.and_then(|p| ids.get(&p).copied());
            let Some(p) = p else {
                return Err(MutationError::path_not_found(record.id));
            };
            (p, record.name.as_str())
        };

        let mut properties = BTreeMap::new();
        for (prop, value) in &record.properties {
            if prop == JCR_PRIMARY_TYPE || prop == JCR_MIXIN_TYPES {
                continue;
            }
            let value = if prop == JCR_UUID {
                PropertyValue::from(id.to_string())
            } else {
                value.map_values(|v| match v.any_reference() {
                    Some(target) => match ids.get(&target) {
                        Some(mapped) => v.with_reference(*mapped),
                        None => v.clone(),
                    },
                    None => v.clone(),
                })
            };
            properties.insert(prop.clone(), value);
        }

        let node = NewNode::new(id, node_name, record.primary_type.clone())
            .with_mixins(record.mixins.clone())
            .with_properties(properties);
        changes.push(repo.insert_node(workspace, node_parent, node)?);
    }
    Ok(())
}
