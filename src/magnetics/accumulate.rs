use crate::magnetics::{NodeKind, SpatialTree};

/// Runs the post-order accumulation pass over a freshly built tree, filling
/// every node's aggregate signed charge and charge-weighted centroid.
///
/// Leaves take the position of any one member (all members of a leaf share
/// coordinates) and the signed sum of member charges. Internal nodes fold in
/// each child whose aggregate charge has nonzero magnitude: the unsigned
/// magnitude |charge| weights the centroid so it stays a physically
/// meaningful mean even when mixed-sign contributions cancel, while the
/// stored aggregate charge is the plain signed sum the force law operates on.
/// A node whose total weight is zero keeps an undefined centroid; its
/// aggregate charge is then also zero, so every evaluator prunes the branch
/// before reading it.
///
/// `positions` and `charges` are indexed by particle index, matching the
/// entries recorded at build time. Runs only in tree mode - explicit-link
/// evaluation never builds or accumulates a tree.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::{accumulate_charges, SpatialTree};
///
/// let positions = vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
/// let charges = vec![1.0, 3.0];
/// let mut tree = SpatialTree::build(2, &positions).unwrap();
/// accumulate_charges(&mut tree, &positions, &charges);
///
/// let root = tree.root().unwrap();
/// assert_eq!(tree.node(root).charge, 4.0);
/// assert_eq!(tree.node(root).centroid[0], 1.5);
/// ```
pub fn accumulate_charges(tree: &mut SpatialTree, positions: &[[f64; 3]], charges: &[f64]) {
    let dim = tree.dim();
    tree.visit_post_order(|tree, index| {
        match tree.node(index).kind {
            NodeKind::Leaf { .. } => {
                let mut charge = 0.0;
                let mut centroid = [0.0; 3];
                if let Some(&head) = tree.leaf_entries(index).first() {
                    centroid = positions[head];
                }
                for &entry in tree.leaf_entries(index) {
                    charge += charges[entry];
                }
                let node = tree.node_mut(index);
                node.charge = charge;
                node.centroid = centroid;
            }
            NodeKind::Internal { children } => {
                let mut charge = 0.0;
                let mut weight = 0.0;
                let mut weighted = [0.0; 3];
                for child in children.into_iter().flatten() {
                    let child_node = tree.node(child);
                    if child_node.charge == 0.0 {
                        continue;
                    }
                    let w = child_node.charge.abs();
                    weight += w;
                    charge += child_node.charge;
                    for k in 0..dim {
                        weighted[k] += child_node.centroid[k] * w;
                    }
                }
                let node = tree.node_mut(index);
                node.charge = charge;
                if weight > 0.0 {
                    for k in 0..dim {
                        node.centroid[k] = weighted[k] / weight;
                    }
                }
            }
        }
    });
}
