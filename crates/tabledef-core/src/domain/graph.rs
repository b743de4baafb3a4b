//! Foreign-key dependency graph and its linearization.
//!
//! Nodes live in an arena (`Vec<Node>`) addressed by [`NodeId`]; a
//! `name → NodeId` index resolves foreign-key targets as nodes are added, in
//! both directions, so forward references resolve once their target shows up.
//!
//! ```text
//!   comments ──► posts ──► users        roots: [comments]
//!        └──────────────────┘           order: users, posts, comments
//! ```
//!
//! Edges point from a table to the tables it references. The linearizer
//! walks the roots and each node's children last to first and emits a node
//! once all of its children are out, so every table lands after everything
//! it transitively depends on. Each node is visited once.

use std::collections::{HashMap, HashSet};

use crate::domain::{entities::TableDefinition, error::DomainError, value_objects::CyclePolicy};

/// Index of a node in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A foreign-key target, resolved once a node with that name exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Unresolved(String),
    Resolved(NodeId),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub table: TableDefinition,
    /// One entry per foreign key, in declaration order.
    pub children: Vec<Child>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn resolved_children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|child| match child {
            Child::Resolved(id) => Some(*id),
            Child::Unresolved(_) => None,
        })
    }

    pub fn unresolved_children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            Child::Unresolved(name) => Some(name.as_str()),
            Child::Resolved(_) => None,
        })
    }
}

/// An edge dropped by [`CyclePolicy::Break`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BrokenEdge {
    pub from: String,
    pub to: String,
}

/// The outcome of [`DependencyGraph::linearize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Linearized {
    pub tables: Vec<TableDefinition>,
    pub broken_edges: Vec<BrokenEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    /// Unresolved child slots waiting for a node of the given name.
    pending: HashMap<String, Vec<(NodeId, usize)>>,
    roots: Vec<NodeId>,
}

impl DependencyGraph {
    /// Build the graph from parsed definitions, in the given order.
    ///
    /// A later definition with an already indexed name is ignored.
    pub fn build(tables: impl IntoIterator<Item = TableDefinition>) -> Self {
        let mut graph = Self::default();
        for table in tables {
            graph.insert(table);
        }
        graph.detect_roots();
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// `(table, missing target)` for every foreign key that never resolved.
    pub fn dangling(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|node| node.unresolved_children().map(move |to| (node.name(), to)))
            .collect()
    }

    /// `true` when `needle` is `haystack` or one of its transitive dependencies.
    pub fn is_child(&self, needle: NodeId, haystack: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![haystack];
        while let Some(current) = stack.pop() {
            if current == needle {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.node(current).resolved_children());
            }
        }
        false
    }

    fn insert(&mut self, table: TableDefinition) -> Option<NodeId> {
        if self.index.contains_key(&table.name) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        let name = table.name.clone();

        // Resolve against nodes already indexed; the node itself is not yet
        // indexed, so a self-reference stays unresolved.
        let children: Vec<Child> = table
            .dependencies()
            .map(|target| match self.index.get(target) {
                Some(&target_id) => Child::Resolved(target_id),
                None => Child::Unresolved(target.to_string()),
            })
            .collect();

        if let Some(waiting) = self.pending.remove(&name) {
            for (owner, slot) in waiting {
                self.nodes[owner.0].children[slot] = Child::Resolved(id);
            }
        }
        for (slot, child) in children.iter().enumerate() {
            if let Child::Unresolved(target) = child {
                self.pending.entry(target.clone()).or_default().push((id, slot));
            }
        }

        self.nodes.push(Node { table, children });
        self.index.insert(name, id);
        Some(id)
    }

    /// Recompute the root set in insertion order.
    ///
    /// A new node absorbs the first root it depends on (later absorbed roots
    /// are dropped); a node that some root depends on is not a root and ends
    /// the scan; otherwise it becomes a new root.
    fn detect_roots(&mut self) {
        self.roots.clear();
        for i in 0..self.nodes.len() {
            let node = NodeId(i);
            let mut next = Vec::with_capacity(self.roots.len() + 1);
            let mut placed = false;
            let mut stop = false;
            for &root in &self.roots {
                if stop {
                    next.push(root);
                } else if self.is_child(root, node) {
                    if !placed {
                        next.push(node);
                        placed = true;
                    }
                } else if self.is_child(node, root) {
                    placed = true;
                    stop = true;
                    next.push(root);
                } else {
                    next.push(root);
                }
            }
            if !placed {
                next.push(node);
            }
            self.roots = next;
        }
    }

    /// Produce the dependency-first order of all reachable tables.
    ///
    /// The result equals reversing a first-to-last DFS pre-order and keeping
    /// the first occurrence of each node. A resolved child already on the
    /// current DFS path closes a cycle and is handled by `policy`.
    pub fn linearize(self, policy: CyclePolicy) -> Result<Linearized, DomainError> {
        let mut walk = Walk {
            graph: &self,
            policy,
            emitted: Vec::with_capacity(self.nodes.len()),
            done: vec![false; self.nodes.len()],
            path: Vec::new(),
            on_path: HashSet::new(),
            broken_edges: Vec::new(),
        };
        for &root in self.roots.iter().rev() {
            if !walk.done[root.0] {
                walk.visit(root)?;
            }
        }
        let Walk {
            emitted,
            broken_edges,
            ..
        } = walk;

        let mut slots: Vec<Option<TableDefinition>> =
            self.nodes.into_iter().map(|node| Some(node.table)).collect();
        let tables = emitted
            .into_iter()
            .filter_map(|id| slots[id.0].take())
            .collect();

        Ok(Linearized {
            tables,
            broken_edges,
        })
    }
}

struct Walk<'g> {
    graph: &'g DependencyGraph,
    policy: CyclePolicy,
    emitted: Vec<NodeId>,
    done: Vec<bool>,
    path: Vec<NodeId>,
    on_path: HashSet<NodeId>,
    broken_edges: Vec<BrokenEdge>,
}

impl Walk<'_> {
    fn visit(&mut self, id: NodeId) -> Result<(), DomainError> {
        self.path.push(id);
        self.on_path.insert(id);

        let graph = self.graph;
        let node = graph.node(id);
        let children: Vec<NodeId> = node.resolved_children().collect();
        for child in children.into_iter().rev() {
            if self.done[child.0] {
                continue;
            }
            if self.on_path.contains(&child) {
                match self.policy {
                    CyclePolicy::Reject => return Err(self.cycle_error(child)),
                    CyclePolicy::Break => {
                        let edge = BrokenEdge {
                            from: node.name().to_string(),
                            to: graph.node(child).name().to_string(),
                        };
                        if !self.broken_edges.contains(&edge) {
                            self.broken_edges.push(edge);
                        }
                        continue;
                    }
                }
            }
            self.visit(child)?;
        }

        self.path.pop();
        self.on_path.remove(&id);
        self.done[id.0] = true;
        self.emitted.push(id);
        Ok(())
    }

    fn cycle_error(&self, closing: NodeId) -> DomainError {
        let start = self
            .path
            .iter()
            .position(|&id| id == closing)
            .unwrap_or_default();
        let mut tables: Vec<String> = self.path[start..]
            .iter()
            .map(|&id| self.graph.node(id).name().to_string())
            .collect();
        tables.push(self.graph.node(closing).name().to_string());
        DomainError::CyclicDependency { tables }
    }
}
