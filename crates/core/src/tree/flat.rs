use super::projector::project;
use super::walker::walk;
use std::collections::HashMap;
use tree_sitter::Node;
use treescope_api::{MiniNode, NodeId};

/// Flattened projection of one tree generation.
///
/// Nodes are stored in pre-order in a single vector; relations are ids
/// resolved through an index, never references between nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTree {
    nodes: Vec<MiniNode>,
    index: HashMap<NodeId, usize>,
}

impl FlatTree {
    /// Walk `root` and project every node, skipping anonymous nodes unless
    /// `include_anonymous` is set.
    ///
    /// `level` is the depth on the unfiltered walk, so hiding anonymous nodes
    /// can leave gaps between a node's level and the level of the closest
    /// visible ancestor.
    pub fn build(root: Node<'_>, source: &str, include_anonymous: bool) -> Self {
        let mut nodes = Vec::new();
        walk(root, |node, context| {
            if include_anonymous || context.is_named {
                nodes.push(project(node, context, source));
            }
        });
        Self::from_nodes(nodes)
    }

    pub fn from_nodes(nodes: Vec<MiniNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();
        Self { nodes, index }
    }

    pub fn nodes(&self) -> &[MiniNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<MiniNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&MiniNode> {
        self.nodes.first()
    }

    pub fn get(&self, id: NodeId) -> Option<&MiniNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Parent of `node`, if it is part of this list.
    pub fn parent(&self, node: &MiniNode) -> Option<&MiniNode> {
        node.parent_id.and_then(|id| self.get(id))
    }

    /// Visible ancestors of `id`, closest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<&MiniNode> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(|node| self.parent(node));
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Ids from the outermost visible ancestor down to `id`.
    pub fn id_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).into_iter().map(|n| n.id).collect();
        path.reverse();
        if self.index.contains_key(&id) {
            path.push(id);
        }
        path
    }
}
