//! Child order representations.
//!
//! A caller describes a new child order either as a list of order-before
//! commands or as the full target name sequence. Either form can be derived
//! from the other; `commands_from_sequence` produces the fewest commands
//! possible by leaving a longest increasing subsequence of children in place.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MutationError, MutationResult};

/// Move `child` so it sits directly before `before`, or last when `before`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBefore {
    pub child: String,
    pub before: Option<String>,
}

impl OrderBefore {
    pub fn new(child: impl Into<String>, before: Option<&str>) -> Self {
        Self {
            child: child.into(),
            before: before.map(str::to_string),
        }
    }

    pub fn to_end(child: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            before: None,
        }
    }
}

/// A desired child order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildOrder {
    Commands(Vec<OrderBefore>),
    Sequence(Vec<String>),
}

/// The form a backend applies natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderStrategy {
    /// One order-before step per moved child.
    #[default]
    Commands,
    /// The whole sequence at once.
    Sequence,
}

/// Apply a single command to `sequence`.
pub fn apply_order_before(sequence: &mut Vec<String>, command: &OrderBefore) -> MutationResult<()> {
    if command.before.as_deref() == Some(command.child.as_str()) {
        return Ok(());
    }
    let from = position(sequence, &command.child)?;
    let child = sequence.remove(from);
    match &command.before {
        Some(before) => {
            let Some(to) = sequence.iter().position(|n| n == before) else {
                sequence.insert(from, child);
                return Err(unknown_child(before));
            };
            sequence.insert(to, child);
        }
        None => sequence.push(child),
    }
    Ok(())
}

/// Replay `commands` on `current`.
pub fn sequence_from_commands(
    current: &[String],
    commands: &[OrderBefore],
) -> MutationResult<Vec<String>> {
    let mut sequence = current.to_vec();
    for command in commands {
        apply_order_before(&mut sequence, command)?;
    }
    Ok(sequence)
}

/// Derive the shortest command list turning `current` into `target`.
pub fn commands_from_sequence(
    current: &[String],
    target: &[String],
) -> MutationResult<Vec<OrderBefore>> {
    check_permutation(current, target)?;

    let index: BTreeMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let positions: Vec<usize> = target.iter().map(|n| index[n.as_str()]).collect();
    let keep: BTreeSet<usize> = longest_increasing_subsequence(&positions)
        .into_iter()
        .collect();

    // Right to left, so every anchor is already in its final place
    let mut commands = Vec::with_capacity(target.len() - keep.len());
    for i in (0..target.len()).rev() {
        if keep.contains(&i) {
            continue;
        }
        commands.push(OrderBefore::new(
            target[i].clone(),
            target.get(i + 1).map(String::as_str),
        ));
    }
    Ok(commands)
}

/// Fail unless `target` names exactly the children in `current`.
pub fn check_permutation(current: &[String], target: &[String]) -> MutationResult<()> {
    let mut a: Vec<&String> = current.iter().collect();
    let mut b: Vec<&String> = target.iter().collect();
    a.sort();
    b.sort();
    if a != b {
        return Err(MutationError::invalid_order(
            "sequence",
            "target is not a permutation of the current children",
        ));
    }
    Ok(())
}

/// Indices into `seq` of one longest strictly increasing subsequence.
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (i, &v) in seq.iter().enumerate() {
        let at = tails.partition_point(|&t| seq[t] < v);
        if at > 0 {
            prev[i] = Some(tails[at - 1]);
        }
        if at == tails.len() {
            tails.push(i);
        } else {
            tails[at] = i;
        }
    }

    let mut out = Vec::with_capacity(tails.len());
    let mut current = tails.last().copied();
    while let Some(i) = current {
        out.push(i);
        current = prev[i];
    }
    out.reverse();
    out
}

fn position(sequence: &[String], name: &str) -> MutationResult<usize> {
    sequence
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| unknown_child(name))
}

fn unknown_child(name: &str) -> MutationError {
    MutationError::invalid_order(name, "no such child")
}
