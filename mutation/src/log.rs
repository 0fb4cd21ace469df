//! The operation log.
//!
//! An ordered batch of pending mutations built by the caller for one save
//! cycle. Order is significant end-to-end: later operations may depend on
//! state created by earlier ones.

use arbor_core::{NodeSnapshot, Path};
use serde::{Deserialize, Serialize};

/// Create a node at `path` with the snapshot's own properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNodeOperation {
    pub path: Path,
    pub node: NodeSnapshot,
}

impl AddNodeOperation {
    pub fn new(path: Path, node: NodeSnapshot) -> Self {
        Self { path, node }
    }
}

/// A logged move. `dst` includes the node's new name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSpec {
    pub src: Path,
    pub dst: Path,
}

impl MoveSpec {
    pub fn new(src: Path, dst: Path) -> Self {
        Self { src, dst }
    }
}

/// Remove the node at `path` with its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveNodeOperation {
    pub path: Path,
}

impl RemoveNodeOperation {
    pub fn new(path: Path) -> Self {
        Self { path }
    }
}

/// Remove the property at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePropertyOperation {
    pub path: Path,
}

impl RemovePropertyOperation {
    pub fn new(path: Path) -> Self {
        Self { path }
    }
}

/// A single pending mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddNode(AddNodeOperation),
    MoveNode(MoveSpec),
    RemoveNode(RemoveNodeOperation),
    RemoveProperty(RemovePropertyOperation),
}

/// Operation kinds, used to group the log into batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Add,
    Move,
    RemoveNode,
    RemoveProperty,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::AddNode(_) => OperationKind::Add,
            Operation::MoveNode(_) => OperationKind::Move,
            Operation::RemoveNode(_) => OperationKind::RemoveNode,
            Operation::RemoveProperty(_) => OperationKind::RemoveProperty,
        }
    }

    /// The path the operation acts on (the source for moves).
    pub fn path(&self) -> &Path {
        match self {
            Operation::AddNode(op) => &op.path,
            Operation::MoveNode(op) => &op.src,
            Operation::RemoveNode(op) => &op.path,
            Operation::RemoveProperty(op) => &op.path,
        }
    }
}

/// A maximal run of same-kind operations, in log order.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    AddNodes(Vec<AddNodeOperation>),
    MoveNodes(Vec<MoveSpec>),
    RemoveNodes(Vec<RemoveNodeOperation>),
    RemoveProperties(Vec<RemovePropertyOperation>),
}

impl Batch {
    fn start(op: Operation) -> Self {
        match op {
            Operation::AddNode(op) => Batch::AddNodes(vec![op]),
            Operation::MoveNode(op) => Batch::MoveNodes(vec![op]),
            Operation::RemoveNode(op) => Batch::RemoveNodes(vec![op]),
            Operation::RemoveProperty(op) => Batch::RemoveProperties(vec![op]),
        }
    }

    /// Append `op` if it has this batch's kind, else hand it back.
    fn extend(&mut self, op: Operation) -> Option<Operation> {
        match (self, op) {
            (Batch::AddNodes(ops), Operation::AddNode(op)) => ops.push(op),
            (Batch::MoveNodes(ops), Operation::MoveNode(op)) => ops.push(op),
            (Batch::RemoveNodes(ops), Operation::RemoveNode(op)) => ops.push(op),
            (Batch::RemoveProperties(ops), Operation::RemoveProperty(op)) => ops.push(op),
            (_, op) => return Some(op),
        }
        None
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Batch::AddNodes(_) => OperationKind::Add,
            Batch::MoveNodes(_) => OperationKind::Move,
            Batch::RemoveNodes(_) => OperationKind::RemoveNode,
            Batch::RemoveProperties(_) => OperationKind::RemoveProperty,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Batch::AddNodes(ops) => ops.len(),
            Batch::MoveNodes(ops) => ops.len(),
            Batch::RemoveNodes(ops) => ops.len(),
            Batch::RemoveProperties(ops) => ops.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered sequence of pending operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationLog {
    operations: Vec<Operation>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Operation) -> &mut Self {
        self.operations.push(op);
        self
    }

    pub fn add_node(&mut self, path: Path, node: NodeSnapshot) -> &mut Self {
        self.push(Operation::AddNode(AddNodeOperation::new(path, node)))
    }

    pub fn move_node(&mut self, src: Path, dst: Path) -> &mut Self {
        self.push(Operation::MoveNode(MoveSpec::new(src, dst)))
    }

    pub fn remove_node(&mut self, path: Path) -> &mut Self {
        self.push(Operation::RemoveNode(RemoveNodeOperation::new(path)))
    }

    pub fn remove_property(&mut self, path: Path) -> &mut Self {
        self.push(Operation::RemoveProperty(RemovePropertyOperation::new(path)))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.operations.iter()
    }

    /// Group contiguous same-kind operations without reordering anything.
    pub fn into_batches(self) -> Vec<Batch> {
        let mut batches: Vec<Batch> = Vec::new();
        for op in self.operations {
            let leftover = match batches.last_mut() {
                Some(batch) => batch.extend(op),
                None => Some(op),
            };
            if let Some(op) = leftover {
                batches.push(Batch::start(op));
            }
        }
        batches
    }

    pub fn batches(&self) -> Vec<Batch> {
        self.clone().into_batches()
    }
}

impl FromIterator<Operation> for OperationLog {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OperationLog {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
