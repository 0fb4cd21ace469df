//! Store operations - node creation and property writes.

use arbor_core::{
    Identifier, NameValidator, PropertySnapshot, PropertyValue, Value, WorkspaceName,
    JCR_MIXIN_TYPES, JCR_PRIMARY_TYPE, JCR_UUID,
};
use arbor_store::{Change, NewNode, Repository};
use tracing::{debug, trace};

use super::resolve_parent;
use crate::error::{MutationError, MutationResult};
use crate::log::AddNodeOperation;

/// Create each node in order with its own properties only.
pub fn store_nodes(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    operations: &[AddNodeOperation],
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    for op in operations {
        let change = store_node(repo, workspace, validator, op)?;
        changes.push(change);
    }
    Ok(())
}

fn store_node(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    op: &AddNodeOperation,
) -> MutationResult<Change> {
    if op.path.is_root() {
        return Err(MutationError::RootNode { operation: "add" });
    }
    let (parent, name) = resolve_parent(repo, workspace, &op.path)?;
    validator.assert_valid_qualified_name(name)?;

    let snapshot = &op.node;
    let types = repo.node_types();
    types.validate_types(&snapshot.primary_type, &snapshot.mixins)?;

    let id = snapshot.proposed_identifier().unwrap_or_else(Identifier::generate);

    let mut properties = snapshot.properties.clone();
    properties.remove(JCR_MIXIN_TYPES);
    properties.insert(
        JCR_PRIMARY_TYPE.to_string(),
        PropertyValue::Single(Value::Name(snapshot.primary_type.clone())),
    );
    if properties.contains_key(JCR_UUID) {
        properties.insert(JCR_UUID.to_string(), PropertyValue::from(id.to_string()));
    }
    let added = types.autocreate(&snapshot.primary_type, &snapshot.mixins, id, &mut properties);
    if !added.is_empty() {
        trace!(path = %op.path, autocreated = ?added, "autocreated properties");
    }
    types.check_node(&snapshot.primary_type, &snapshot.mixins, &properties)?;

    let node = NewNode::new(id, name, snapshot.primary_type.clone())
        .with_mixins(snapshot.mixins.clone())
        .with_properties(properties);
    let change = repo.insert_node(workspace, parent, node)?;
    debug!(path = %op.path, id = %id, "stored node");
    Ok(change)
}

/// Write one property at its owning node.
pub fn store_property(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    validator: &NameValidator,
    property: &PropertySnapshot,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    let (id, name) = resolve_parent(repo, workspace, &property.path)?;
    validator.assert_valid_qualified_name(name)?;

    if name == JCR_MIXIN_TYPES {
        return store_mixins(repo, workspace, id, &property.value, changes);
    }

    let (primary, mixins) = node_types_of(repo, workspace, id)?;
    if name == JCR_PRIMARY_TYPE || repo.node_types().is_protected(&primary, &mixins, name) {
        return Err(MutationError::protected_property(name));
    }

    changes.push(repo.set_property(workspace, id, name, property.value.clone())?);
    check_stored_node(repo, workspace, id)?;
    debug!(path = %property.path, "stored property");
    Ok(())
}

/// Replace a node's mixins and autocreate what the new mixins require.
fn store_mixins(
    repo: &mut Repository,
    workspace: &WorkspaceName,
    id: Identifier,
    value: &PropertyValue,
    changes: &mut Vec<Change>,
) -> MutationResult<()> {
    let mut mixins = Vec::new();
    for v in value.values() {
        let Some(name) = v.as_str() else {
            return Err(MutationError::invalid_value(
                JCR_MIXIN_TYPES,
                format!("expected a name, got {}", v.type_name()),
            ));
        };
        if !mixins.iter().any(|m| m == name) {
            mixins.push(name.to_string());
        }
    }

    let (primary, _) = node_types_of(repo, workspace, id)?;
    repo.node_types().validate_types(&primary, &mixins)?;
    changes.push(repo.set_mixins(workspace, id, mixins.clone())?);

    let mut properties = repo
        .workspace(workspace)?
        .node(id)
        .map(|n| n.properties.clone())
        .unwrap_or_default();
    let added = repo.node_types().autocreate(&primary, &mixins, id, &mut properties);
    for name in added {
        if let Some(value) = properties.remove(&name) {
            changes.push(repo.set_property(workspace, id, &name, value)?);
        }
    }

    check_stored_node(repo, workspace, id)?;
    debug!(id = %id, mixins = ?mixins, "stored mixins");
    Ok(())
}

pub(crate) fn node_types_of(
    repo: &Repository,
    workspace: &WorkspaceName,
    id: Identifier,
) -> MutationResult<(String, Vec<String>)> {
    let node = repo
        .workspace(workspace)?
        .node(id)
        .ok_or_else(|| MutationError::path_not_found(id))?;
    Ok((node.primary_type.clone(), node.mixins.clone()))
}

/// Validate a stored node against its types.
pub(crate) fn check_stored_node(
    repo: &Repository,
    workspace: &WorkspaceName,
    id: Identifier,
) -> MutationResult<()> {
    let node = repo
        .workspace(workspace)?
        .node(id)
        .ok_or_else(|| MutationError::path_not_found(id))?;
    repo.node_types()
        .check_node(&node.primary_type, &node.mixins, &node.properties)?;
    Ok(())
}

