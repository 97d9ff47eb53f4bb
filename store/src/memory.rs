// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use distcalc_errors::StoreError;
use distcalc_parser::Node;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::model::{new_id, Expression, ExpressionId, ExpressionStatus, FitTask, NodeId, StoredNode, UserId};

/// The abstract shape every backend must provide (§6). `InMemoryStore` is the
/// only implementation shipped here; a real deployment would swap in one
/// backed by a document store without touching the dispatch coordinator or
/// HTTP layer, both of which only depend on this trait.
#[allow(async_fn_in_trait)]
pub trait GraphStore {
    async fn create(&self, user_id: UserId, origin: String, ast: &Node) -> Result<ExpressionId, StoreError>;
    async fn get(&self, expression_id: &str) -> Option<Expression>;
    async fn get_by_user(&self, user_id: &str) -> Vec<Expression>;
    async fn get_node(&self, node_id: &str) -> Option<StoredNode>;
    async fn fit_nodes(&self, retry_interval: Duration) -> Vec<FitTask>;
    async fn apply_result(&self, node_id: &str, value: f64) -> Result<(), StoreError>;
    async fn apply_error(&self, node_id: &str, message: String) -> Result<(), StoreError>;
    async fn delete(&self, expression_id: &str) -> Result<(), StoreError>;
    async fn delete_by_user(&self, user_id: &str) -> usize;
}

#[derive(Default)]
struct Inner {
    expressions: HashMap<ExpressionId, Expression>,
    nodes: HashMap<NodeId, StoredNode>,
}

/// In-memory task graph store (§6, §10.4). Guarded by a single lock: every
/// operation here is pure CPU work, so there is never an `.await` while the
/// lock is held.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    changed: mpsc::Sender<()>,
}

impl InMemoryStore {
    /// `changed` is signalled (best-effort, a full buffer just means a scan
    /// is already pending) after any write that could make a node fit for
    /// dispatch.
    pub fn new(changed: mpsc::Sender<()>) -> Self {
        Self { inner: Mutex::new(Inner::default()), changed }
    }

    fn signal(&self) {
        let _ = self.changed.try_send(());
    }
}

/// Inserts `ast` bottom-up, returning the id of the root node. Leaf numbers
/// get their own node even though the root-level bare-number case is handled
/// by the caller before this is reached (§6 Create).
fn insert_tree(nodes: &mut HashMap<NodeId, StoredNode>, ast: &Node) -> NodeId {
    match ast {
        Node::Num(v) => {
            let id = new_id();
            nodes.insert(id.clone(), StoredNode::Number(*v));
            id
        }
        Node::Binary { left, op, right } => {
            let left_id = insert_tree(nodes, left);
            let right_id = insert_tree(nodes, right);
            let id = new_id();
            nodes.insert(id.clone(), StoredNode::Operation { op: *op, left: left_id, right: right_id, dispatched_at: None });
            id
        }
    }
}

/// Removes a node and, recursively, its children (§6: deleteNodes).
fn delete_subtree(nodes: &mut HashMap<NodeId, StoredNode>, id: &str) {
    if let Some(StoredNode::Operation { left, right, .. }) = nodes.remove(id) {
        delete_subtree(nodes, &left);
        delete_subtree(nodes, &right);
    }
}

impl GraphStore for InMemoryStore {
    async fn create(&self, user_id: UserId, origin: String, ast: &Node) -> Result<ExpressionId, StoreError> {
        let mut inner = self.inner.lock();

        let (status, result, root_node_id) = match ast {
            Node::Num(v) => (ExpressionStatus::Finished, Some(*v), None),
            _ => {
                let root = insert_tree(&mut inner.nodes, ast);
                (ExpressionStatus::Pending, None, Some(root))
            }
        };

        let id = new_id();
        inner.expressions.insert(
            id.clone(),
            Expression { id: id.clone(), user_id, origin, status, result, error: None, root_node_id, created_at: Utc::now() },
        );
        drop(inner);
        self.signal();
        Ok(id)
    }

    async fn get(&self, expression_id: &str) -> Option<Expression> {
        self.inner.lock().expressions.get(expression_id).cloned()
    }

    async fn get_by_user(&self, user_id: &str) -> Vec<Expression> {
        self.inner.lock().expressions.values().filter(|e| e.user_id == user_id).cloned().collect()
    }

    async fn get_node(&self, node_id: &str) -> Option<StoredNode> {
        self.inner.lock().nodes.get(node_id).cloned()
    }

    async fn fit_nodes(&self, retry_interval: Duration) -> Vec<FitTask> {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        let mut selected: Vec<(NodeId, f64, f64, distcalc_proto::Op)> = Vec::new();
        for (id, node) in inner.nodes.iter() {
            let StoredNode::Operation { op, left, right, dispatched_at } = node else { continue };
            let ready = match dispatched_at {
                None => true,
                Some(t) => now.duration_since(*t) > retry_interval,
            };
            if !ready {
                continue;
            }
            let left_value = match inner.nodes.get(left) {
                Some(StoredNode::Number(v)) => Some(*v),
                _ => None,
            };
            let right_value = match inner.nodes.get(right) {
                Some(StoredNode::Number(v)) => Some(*v),
                _ => None,
            };
            if let (Some(a), Some(b)) = (left_value, right_value) {
                selected.push((id.clone(), a, b, *op));
            }
        }

        for (id, _, _, _) in &selected {
            if let Some(StoredNode::Operation { dispatched_at, .. }) = inner.nodes.get_mut(id) {
                *dispatched_at = Some(now);
            }
        }

        selected.into_iter().map(|(node_id, arg1, arg2, op)| FitTask { node_id, arg1, arg2, op }).collect()
    }

    async fn apply_result(&self, node_id: &str, value: f64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();

        let root_of: Vec<ExpressionId> = inner
            .expressions
            .values()
            .filter(|e| e.root_node_id.as_deref() == Some(node_id))
            .map(|e| e.id.clone())
            .collect();

        if !root_of.is_empty() {
            for id in &root_of {
                if let Some(expr) = inner.expressions.get_mut(id) {
                    expr.status = ExpressionStatus::Finished;
                    expr.result = Some(value);
                    expr.error = None;
                    expr.root_node_id = None;
                }
            }
            delete_subtree(&mut inner.nodes, node_id);
        } else {
            match inner.nodes.get(node_id).cloned() {
                Some(StoredNode::Operation { left, right, .. }) => {
                    inner.nodes.insert(node_id.to_string(), StoredNode::Number(value));
                    delete_subtree(&mut inner.nodes, &left);
                    delete_subtree(&mut inner.nodes, &right);
                }
                Some(StoredNode::Number(_)) => {
                    // Already applied; re-applying the same result is a benign no-op (§5 at-least-once).
                    inner.nodes.insert(node_id.to_string(), StoredNode::Number(value));
                }
                None => return Err(StoreError::NodeNotFound),
            }
        }

        drop(inner);
        self.signal();
        Ok(())
    }

    async fn apply_error(&self, node_id: &str, message: String) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();

        if !inner.nodes.contains_key(node_id) {
            return Err(StoreError::NodeNotFound);
        }

        // Walk upward to the root operation node: I2 guarantees a node has at
        // most one parent, so this is a simple chain, not a tree search. The
        // bound guards against a cycle that should never exist (I2 again).
        let mut current = node_id.to_string();
        for _ in 0..=inner.nodes.len() {
            let parent = inner.nodes.iter().find_map(|(id, node)| match node {
                StoredNode::Operation { left, right, .. } if left == &current || right == &current => Some(id.clone()),
                _ => None,
            });
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }

        let root_of: Vec<ExpressionId> = inner
            .expressions
            .values()
            .filter(|e| e.root_node_id.as_deref() == Some(current.as_str()))
            .map(|e| e.id.clone())
            .collect();

        if root_of.is_empty() {
            return Err(StoreError::ExpressionNotFound);
        }

        for id in &root_of {
            if let Some(expr) = inner.expressions.get_mut(id) {
                expr.status = ExpressionStatus::Error;
                expr.error = Some(message.clone());
                expr.result = None;
                expr.root_node_id = None;
            }
        }
        delete_subtree(&mut inner.nodes, &current);

        drop(inner);
        self.signal();
        Ok(())
    }

    async fn delete(&self, expression_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let expr = inner.expressions.remove(expression_id).ok_or(StoreError::ExpressionNotFound)?;
        if let Some(root) = expr.root_node_id {
            delete_subtree(&mut inner.nodes, &root);
        }
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &str) -> usize {
        let mut inner = self.inner.lock();
        let ids: Vec<ExpressionId> =
            inner.expressions.values().filter(|e| e.user_id == user_id).map(|e| e.id.clone()).collect();
        for id in &ids {
            if let Some(expr) = inner.expressions.remove(id) {
                if let Some(root) = expr.root_node_id {
                    delete_subtree(&mut inner.nodes, &root);
                }
            }
        }
        ids.len()
    }
}
