//! The adaptive code tree shared (by construction, never by reference) between the encoder and
//! the decoder.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Alongside the arena the tree
//! keeps a global order over its nodes: a fixed array of slots in which weights never decrease
//! from the lowest occupied slot (always the NYT) to the highest one (always the root). The
//! update procedure in [`Tree::increment`] relies on that order to pick swap partners, so the
//! two sides of a session stay in lockstep as long as they feed the tree the same symbols.

mod node;
mod update;

pub use node::{Node, NodeId, NodeKind, Side};

use smallvec::SmallVec;
use thiserror::Error;

/// Number of distinct symbols the tree can hold
pub const ALPHABET_SIZE: usize = 256;

/// Upper bound on the node count: one leaf and one internal node per symbol, plus the NYT
pub const MAX_NODES: usize = 2 * ALPHABET_SIZE + 1;

const ROOT_SLOT: usize = MAX_NODES - 1;

/// A root-to-node codeword, one [`Side`] per edge
pub type Path = SmallVec<[Side; 32]>;

/// Errors raised by tree operations and by [`Tree::validate`]
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("symbol {0:#04x} already has a leaf")]
    SymbolExists(u8),

    #[error("order slot {slot} does not match the node stored in it")]
    BrokenOrderIndex { slot: usize },

    #[error("weight decreases between order slots {slot} and the slot above it")]
    OrderViolation { slot: usize },

    #[error("node {node} has weight {weight}, but its children sum to {children}")]
    WeightMismatch {
        node: usize,
        weight: u64,
        children: u64,
    },

    #[error("node {node} has a broken parent link")]
    BrokenLink { node: usize },

    #[error("node {node} is not ordered above its children")]
    ParentBelowChild { node: usize },

    #[error("the children of node {node} are not adjacent in the weight order")]
    SiblingsApart { node: usize },

    #[error("expected a single zero-weight NYT leaf in the lowest slot, found {count} NYT nodes")]
    BadNyt { count: usize },

    #[error("symbol index holds {indexed} symbols, but the tree has {leaves} symbol leaves")]
    LeafCountMismatch { indexed: usize, leaves: usize },
}

/// The adaptive Huffman tree for one encode or decode session
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    /// Node in each order slot. Slots below the NYT's are unused.
    slots: Vec<Option<NodeId>>,
    /// Leaf for each symbol seen so far
    symbols: [Option<NodeId>; ALPHABET_SIZE],
    root: NodeId,
    nyt: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding nothing but the NYT, which is also the root
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut slots = vec![None; MAX_NODES];
        slots[ROOT_SLOT] = Some(root);

        Self {
            nodes: vec![Node::nyt(None, ROOT_SLOT)],
            slots,
            symbols: [None; ALPHABET_SIZE],
            root,
            nyt: root,
        }
    }

    /// The root, whose slot never changes
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The current not-yet-transmitted leaf
    pub fn nyt(&self) -> NodeId {
        self.nyt
    }

    /// Borrow a node. Ids are only handed out by this tree, so lookups never miss.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The child of `id` on the given side, or `None` if `id` is a leaf
    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.nodes[id.0].child(side)
    }

    /// The leaf for `symbol`, if it has been seen
    pub fn leaf_for(&self, symbol: u8) -> Option<NodeId> {
        self.symbols[symbol as usize]
    }

    /// Number of symbol leaves (the NYT is not counted)
    pub fn leaf_count(&self) -> usize {
        (self.nodes.len() - 1) / 2
    }

    /// Number of nodes in the arena, NYT included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Weight of the root, i.e. the number of symbols recorded so far
    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root.0].weight
    }

    /// Find the block leader for `weight`: the node of that weight in the highest order slot.
    ///
    /// Scans down from the root's slot. Returns `None` if no node carries `weight`.
    pub fn locate_block_leader(&self, weight: u64) -> Option<NodeId> {
        let lowest = self.nodes[self.nyt.0].order;
        self.slots[lowest..]
            .iter()
            .rev()
            .flatten()
            .copied()
            .find(|id| self.nodes[id.0].weight == weight)
    }

    /// Exchange the tree positions of `a` and `b`.
    ///
    /// Each node keeps its own subtree; only the order slots and the parent links trade places.
    /// Siblings are handled too, in which case the parent's two children are simply exchanged.
    /// The root has no position to trade, so a swap involving it does nothing.
    pub(crate) fn swap_positions(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b, "cannot swap a node with itself");
        let (Some(parent_a), Some(parent_b)) = (self.nodes[a.0].parent, self.nodes[b.0].parent)
        else {
            return;
        };
        let side_a = self.side_of(parent_a, a);
        let side_b = self.side_of(parent_b, b);

        self.set_child(parent_a, side_a, b);
        self.set_child(parent_b, side_b, a);
        self.nodes[a.0].parent = Some(parent_b);
        self.nodes[b.0].parent = Some(parent_a);

        let (order_a, order_b) = (self.nodes[a.0].order, self.nodes[b.0].order);
        self.slots[order_a] = Some(b);
        self.slots[order_b] = Some(a);
        self.nodes[a.0].order = order_b;
        self.nodes[b.0].order = order_a;
    }

    /// Split the NYT leaf to make room for a new symbol.
    ///
    /// The old NYT becomes an internal node in place, so it keeps its parent link and order slot.
    /// Its left child is a fresh NYT (weight 0) and its right child a leaf for `symbol`
    /// (weight 1). The internal node still has weight 0 when this returns: it is the node
    /// [`Tree::increment`] must start from.
    pub fn insert_symbol_pair(&mut self, symbol: u8) -> Result<NodeId, TreeError> {
        if self.symbols[symbol as usize].is_some() {
            return Err(TreeError::SymbolExists(symbol));
        }

        let internal = self.nyt;
        let slot = self.nodes[internal.0].order;
        debug_assert!(slot >= 2, "order slots exhausted");

        let leaf = NodeId(self.nodes.len());
        self.nodes.push(Node::leaf(symbol, internal, slot - 1));
        let nyt = NodeId(self.nodes.len());
        self.nodes.push(Node::nyt(Some(internal), slot - 2));

        self.nodes[internal.0].kind = NodeKind::Internal {
            left: nyt,
            right: leaf,
        };
        self.slots[slot - 1] = Some(leaf);
        self.slots[slot - 2] = Some(nyt);
        self.symbols[symbol as usize] = Some(leaf);
        self.nyt = nyt;

        Ok(internal)
    }

    /// The codeword for `id`, found by climbing parent links and reversing the steps.
    /// The root's own path is empty.
    pub fn path_to(&self, id: NodeId) -> Path {
        let mut path = Path::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(self.side_of(parent, current));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Check every structural invariant of the tree.
    ///
    /// Only meaningful between updates; [`Tree::insert_symbol_pair`] leaves the tree
    /// unbalanced until the matching [`Tree::increment`] has run.
    pub fn validate(&self) -> Result<(), TreeError> {
        let lowest = self.nodes[self.nyt.0].order;

        for (slot, entry) in self.slots.iter().enumerate() {
            let consistent = match entry {
                Some(id) => slot >= lowest && self.nodes[id.0].order == slot,
                None => slot < lowest,
            };
            if !consistent {
                return Err(TreeError::BrokenOrderIndex { slot });
            }
        }
        if MAX_NODES - lowest != self.nodes.len() {
            return Err(TreeError::BrokenOrderIndex { slot: lowest });
        }

        for slot in lowest..ROOT_SLOT {
            if self.slot_weight(slot) > self.slot_weight(slot + 1) {
                return Err(TreeError::OrderViolation { slot });
            }
        }

        let nyt_count = self.nodes.iter().filter(|node| node.is_nyt()).count();
        if nyt_count != 1 || !self.nodes[self.nyt.0].is_nyt() || self.nodes[self.nyt.0].weight != 0
        {
            return Err(TreeError::BadNyt { count: nyt_count });
        }

        let root = &self.nodes[self.root.0];
        if root.parent.is_some() || root.order != ROOT_SLOT {
            return Err(TreeError::BrokenLink { node: self.root.0 });
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let NodeKind::Internal { left, right } = node.kind else {
                if node.parent.is_none() && index != self.root.0 {
                    return Err(TreeError::BrokenLink { node: index });
                }
                continue;
            };
            let (left_node, right_node) = (&self.nodes[left.0], &self.nodes[right.0]);

            for (child, child_node) in [(left, left_node), (right, right_node)] {
                if child_node.parent != Some(NodeId(index)) {
                    return Err(TreeError::BrokenLink { node: child.0 });
                }
                if child_node.order >= node.order {
                    return Err(TreeError::ParentBelowChild { node: index });
                }
            }
            if left_node.order.abs_diff(right_node.order) != 1 {
                return Err(TreeError::SiblingsApart { node: index });
            }

            let children = left_node.weight + right_node.weight;
            if node.weight != children {
                return Err(TreeError::WeightMismatch {
                    node: index,
                    weight: node.weight,
                    children,
                });
            }
        }

        let leaves = self.nodes.iter().filter(|node| node.symbol().is_some()).count();
        let indexed = self
            .symbols
            .iter()
            .enumerate()
            .filter(|(symbol, entry)| {
                entry.map_or(false, |id| self.nodes[id.0].symbol() == Some(*symbol as u8))
            })
            .count();
        let registered = self.symbols.iter().flatten().count();
        if leaves != indexed || registered != indexed {
            return Err(TreeError::LeafCountMismatch {
                indexed: registered,
                leaves,
            });
        }

        Ok(())
    }

    fn slot_weight(&self, slot: usize) -> u64 {
        self.slots[slot].map_or(0, |id| self.nodes[id.0].weight)
    }

    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        match self.nodes[parent.0].kind {
            NodeKind::Internal { left, .. } if left == child => Side::Left,
            _ => Side::Right,
        }
    }

    fn set_child(&mut self, parent: NodeId, side: Side, child: NodeId) {
        if let NodeKind::Internal { left, right } = &mut self.nodes[parent.0].kind {
            match side {
                Side::Left => *left = child,
                Side::Right => *right = child,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tree: &mut Tree, input: &[u8]) {
        for &symbol in input {
            let start = match tree.leaf_for(symbol) {
                Some(leaf) => leaf,
                None => tree.insert_symbol_pair(symbol).unwrap(),
            };
            tree.increment(start);
            tree.validate().unwrap();
        }
    }

    fn bits(path: &Path) -> Vec<u8> {
        path.iter().map(|side| side.bit() as u8).collect()
    }

    #[test]
    fn new_tree_is_a_lone_nyt() {
        let tree = Tree::new();
        assert_eq!(tree.root(), tree.nyt());
        assert!(tree.node(tree.root()).is_nyt());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.total_weight(), 0);
        assert!(tree.path_to(tree.nyt()).is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn insert_splits_the_nyt_in_place() {
        let mut tree = Tree::new();
        let old_nyt = tree.nyt();
        let internal = tree.insert_symbol_pair(0).unwrap();

        assert_eq!(internal, old_nyt);
        assert_eq!(tree.node(internal).order(), ROOT_SLOT);
        assert_eq!(tree.node(internal).weight(), 0);

        let leaf = tree.leaf_for(0).unwrap();
        assert_eq!(tree.node(leaf).symbol(), Some(0));
        assert_eq!(tree.node(leaf).weight(), 1);
        assert_eq!(tree.node(leaf).order(), ROOT_SLOT - 1);
        assert_eq!(tree.child(internal, Side::Right), Some(leaf));

        let nyt = tree.nyt();
        assert_eq!(tree.node(nyt).order(), ROOT_SLOT - 2);
        assert_eq!(tree.child(internal, Side::Left), Some(nyt));

        // weight 0 is still carried by the new internal node until the update runs
        assert!(tree.validate().is_err());
        tree.increment(internal);
        tree.validate().unwrap();
        assert_eq!(tree.total_weight(), 1);
    }

    #[test]
    fn insert_rejects_known_symbol() {
        let mut tree = Tree::new();
        record(&mut tree, b"x");
        assert_eq!(
            tree.insert_symbol_pair(b'x'),
            Err(TreeError::SymbolExists(b'x'))
        );
    }

    #[test]
    fn zero_byte_is_an_ordinary_symbol() {
        let mut tree = Tree::new();
        record(&mut tree, &[0, 0, 1, 0]);
        let leaf = tree.leaf_for(0).unwrap();
        assert_eq!(tree.node(leaf).symbol(), Some(0));
        assert_eq!(tree.node(leaf).weight(), 3);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn block_leader_is_highest_slot_of_weight() {
        let mut tree = Tree::new();
        record(&mut tree, b"ab");

        // slots from the top: root(2), a(1), internal(1), b(1), nyt(0)
        let a = tree.leaf_for(b'a').unwrap();
        assert_eq!(tree.locate_block_leader(1), Some(a));
        assert_eq!(tree.locate_block_leader(2), Some(tree.root()));
        assert_eq!(tree.locate_block_leader(0), Some(tree.nyt()));
        assert_eq!(tree.locate_block_leader(7), None);
    }

    #[test]
    fn increment_moves_leaf_to_block_leader() {
        let mut tree = Tree::new();
        record(&mut tree, b"ab");
        assert_eq!(bits(&tree.path_to(tree.leaf_for(b'a').unwrap())), [1]);
        assert_eq!(bits(&tree.path_to(tree.leaf_for(b'b').unwrap())), [0, 1]);

        record(&mut tree, b"b");
        assert_eq!(bits(&tree.path_to(tree.leaf_for(b'a').unwrap())), [0, 1]);
        assert_eq!(bits(&tree.path_to(tree.leaf_for(b'b').unwrap())), [1]);
        assert_eq!(bits(&tree.path_to(tree.nyt())), [0, 0]);
        assert_eq!(tree.node(tree.leaf_for(b'b').unwrap()).order(), ROOT_SLOT - 1);
    }

    #[test]
    fn swap_keeps_subtrees() {
        let mut tree = Tree::new();
        record(&mut tree, b"ab");
        let a = tree.leaf_for(b'a').unwrap();
        let internal = tree.node(tree.leaf_for(b'b').unwrap()).parent().unwrap();
        let nyt = tree.nyt();

        tree.swap_positions(a, internal);

        assert_eq!(tree.child(tree.root(), Side::Right), Some(internal));
        assert_eq!(tree.child(tree.root(), Side::Left), Some(a));
        assert_eq!(tree.node(internal).parent(), Some(tree.root()));
        assert_eq!(tree.child(internal, Side::Left), Some(nyt));
        assert_eq!(tree.node(a).order(), ROOT_SLOT - 2);
        assert_eq!(tree.node(internal).order(), ROOT_SLOT - 1);
    }

    #[test]
    fn swap_siblings_exchanges_children() {
        let mut tree = Tree::new();
        record(&mut tree, b"a");
        let a = tree.leaf_for(b'a').unwrap();
        let nyt = tree.nyt();

        tree.swap_positions(a, nyt);

        assert_eq!(tree.child(tree.root(), Side::Left), Some(a));
        assert_eq!(tree.child(tree.root(), Side::Right), Some(nyt));
        assert_eq!(tree.node(a).parent(), Some(tree.root()));
        assert_eq!(tree.node(nyt).parent(), Some(tree.root()));
    }

    #[test]
    fn full_alphabet_fills_every_slot() {
        let mut tree = Tree::new();
        let input: Vec<u8> = (0..=255).collect();
        record(&mut tree, &input);

        assert_eq!(tree.leaf_count(), ALPHABET_SIZE);
        assert_eq!(tree.node_count(), MAX_NODES);
        assert_eq!(tree.node(tree.nyt()).order(), 0);
        assert_eq!(tree.total_weight(), 256);

        record(&mut tree, &input);
        assert_eq!(tree.node_count(), MAX_NODES);
        assert_eq!(tree.total_weight(), 512);
    }
}
