//! In-memory monitoring tree.

use crate::producer::MonitoringProducer;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TreeNode {
    value: Option<Value>,
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn descend(&self, path: &[&str]) -> Option<&TreeNode> {
        let mut node = self;
        for segment in path {
            node = node.children.get(*segment)?;
        }
        Some(node)
    }

    fn descend_or_create(&mut self, path: &[&str]) -> &mut TreeNode {
        let mut node = self;
        for segment in path {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node
    }
}

/// Hierarchical store backing the passive-side monitoring services: values
/// live under structural key paths, best-effort pushes accumulate per topic.
#[derive(Default)]
pub struct MonitoringTree {
    root: RwLock<TreeNode>,
    best_efforts: Mutex<BTreeMap<String, Vec<Value>>>,
}

impl MonitoringTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored at `path`, if any.
    pub fn node_value(&self, path: &[&str]) -> Option<Value> {
        self.root
            .read()
            .descend(path)
            .and_then(|node| node.value.clone())
    }

    /// Names of the direct children under `path`.
    pub fn child_names(&self, path: &[&str]) -> Vec<String> {
        self.root
            .read()
            .descend(path)
            .map(|node| node.children.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Everything pushed on `topic` so far, in arrival order.
    pub fn best_efforts(&self, topic: &str) -> Vec<Value> {
        self.best_efforts
            .lock()
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }
}

impl MonitoringProducer for MonitoringTree {
    fn add_node(&self, parents: &[&str], name: &str, value: Value) {
        let mut root = self.root.write();
        let parent = root.descend_or_create(parents);
        let node = parent.children.entry(name.to_string()).or_default();
        node.value = Some(value);
    }

    fn remove_node(&self, parents: &[&str], name: &str) {
        let mut root = self.root.write();
        if let Some(parent) = parents
            .iter()
            .try_fold(&mut *root, |node, segment| node.children.get_mut(*segment))
        {
            parent.children.remove(name);
        }
    }

    fn push_best_efforts(&self, topic: &str, value: Value) {
        self.best_efforts
            .lock()
            .entry(topic.to_string())
            .or_default()
            .push(value);
    }
}
