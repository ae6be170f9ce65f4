use super::{NodeId, Tree};

impl Tree {
    /// Record one more occurrence below `start` and restore the sibling property.
    ///
    /// `start` is either the leaf of an already known symbol or the internal node returned by
    /// [`Tree::insert_symbol_pair`]. From there up to the root, each node is first moved into
    /// the highest slot of its weight class (unless the leader is its own parent or child), then
    /// its weight is raised by one. Ties are broken by slot.
    pub fn increment(&mut self, start: NodeId) {
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            let weight = self.nodes[node.0].weight;
            if let Some(leader) = self.locate_block_leader(weight) {
                let related = self.nodes[node.0].parent == Some(leader)
                    || self.nodes[leader.0].parent == Some(node);
                if leader != node && !related {
                    tracing::trace!(node = node.0, leader = leader.0, weight, "swap");
                    self.swap_positions(node, leader);
                }
            }

            self.nodes[node.0].weight += 1;
            cursor = self.nodes[node.0].parent;
        }
    }
}
