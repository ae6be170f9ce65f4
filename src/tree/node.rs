/// Index of a [`Node`] in the tree's arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Which child of its parent a node is. Left is coded as a `0` bit, right as a `1` bit.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The bit emitted when a codeword descends through this side
    pub fn bit(self) -> bool {
        matches!(self, Side::Right)
    }

    /// The side selected by a codeword bit
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// What a node is. Symbols are carried by the variant tag, so byte `0x00` is an ordinary symbol.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The not-yet-transmitted sentinel leaf
    Nyt,

    /// A leaf for a symbol that has been seen at least once
    Leaf(u8),

    /// An internal node. Both children are owned by this node.
    Internal { left: NodeId, right: NodeId },
}

/// A single record in the tree's arena
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) weight: u64,
    pub(crate) parent: Option<NodeId>,
    /// Slot in the global weight order. Higher slots never carry a lower weight.
    pub(crate) order: usize,
}

impl Node {
    pub(crate) fn nyt(parent: Option<NodeId>, order: usize) -> Self {
        Self {
            kind: NodeKind::Nyt,
            weight: 0,
            parent,
            order,
        }
    }

    pub(crate) fn leaf(symbol: u8, parent: NodeId, order: usize) -> Self {
        Self {
            kind: NodeKind::Leaf(symbol),
            weight: 1,
            parent: Some(parent),
            order,
        }
    }

    /// What this node is
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Number of symbols recorded below this node
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Slot in the global weight order
    pub fn order(&self) -> usize {
        self.order
    }

    /// The symbol carried by this node, if it is a symbol leaf
    pub fn symbol(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// True for symbol leaves and the NYT
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, NodeKind::Internal { .. })
    }

    /// True for the not-yet-transmitted leaf
    pub fn is_nyt(&self) -> bool {
        matches!(self.kind, NodeKind::Nyt)
    }

    /// The child on the given side. `None` for leaves.
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match (self.kind, side) {
            (NodeKind::Internal { left, .. }, Side::Left) => Some(left),
            (NodeKind::Internal { right, .. }, Side::Right) => Some(right),
            _ => None,
        }
    }
}
