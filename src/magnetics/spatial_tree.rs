use crate::errors::MagneticsError;

/// Recursion limit for near-coincident point clusters. A branch that reaches
/// this depth becomes a leaf and its members are evaluated individually, so
/// force results stay exact.
const MAX_DEPTH: usize = 48;

/// The two node shapes of the partition tree.
///
/// Internal nodes own up to 2^D child slots (segment halves, quadrants or
/// octants depending on the dimension); only the first 2^D slots of the fixed
/// array are ever populated. Leaf nodes hold a `(first, count)` range into the
/// tree's shared particle-index array - the members of a leaf are coincident
/// except when the depth cap forced the branch closed early.
#[derive(Clone, Copy, Debug)]
pub enum NodeKind {
    /// Region subdivided into 2^D children, addressed by octant code.
    Internal { children: [Option<usize>; 8] },
    /// Terminal region owning a range of particle indices.
    Leaf { first: usize, count: usize },
}

/// A node of the spatial partition tree.
///
/// The region extent (`lower`/`upper` per axis) is fixed at build time; the
/// `charge` and `centroid` fields start zeroed and are filled by the
/// accumulation pass before any force traversal reads them.
#[derive(Clone, Copy, Debug)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Low extent of the region, per axis.
    pub lower: [f64; 3],
    /// High extent of the region, per axis.
    pub upper: [f64; 3],
    /// Aggregate signed charge of the region (set by accumulation).
    pub charge: f64,
    /// Charge-weighted mean position of the region (set by accumulation).
    pub centroid: [f64; 3],
}

/// A dimension-generic spatial partition over a point set.
///
/// One structure covers D in {1, 2, 3}: the partition arity is 2^D and the
/// child slot for a point is the bit code of its per-axis midpoint
/// comparisons. Nodes live contiguously in a `Vec` arena and reference
/// children by index; leaves reference particles through index ranges into a
/// shared entry array, so no pointer chains are walked during evaluation.
///
/// The tree is rebuilt from scratch every step from current positions and is
/// never shared across steps.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::SpatialTree;
///
/// let positions = vec![
///     [0.0, 0.0, 0.0],
///     [1.0, 1.0, 0.0],
///     [1.0, 0.0, 0.0],
/// ];
/// let tree = SpatialTree::build(2, &positions).expect("Failed to build tree");
/// assert!(tree.root().is_some());
/// ```
pub struct SpatialTree {
    dim: usize,
    nodes: Vec<TreeNode>,
    entries: Vec<usize>,
    root: Option<usize>,
}

impl SpatialTree {
    /// Builds a partition tree covering `positions`.
    ///
    /// The cover is anchored at the floored per-axis minimum and expanded to
    /// a shared power-of-two side length, so region extents halve cleanly at
    /// every level and the admissibility ratio seen by the traversal stays
    /// stable under small coordinate changes.
    ///
    /// Child nodes are always appended to the arena before their parent, so
    /// ascending index order is a valid bottom-up order.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` is not 1, 2 or 3.
    pub fn build(dim: usize, positions: &[[f64; 3]]) -> Result<Self, MagneticsError> {
        if !(1..=3).contains(&dim) {
            return Err(MagneticsError::InvalidDimension(dim));
        }

        let mut tree = SpatialTree {
            dim,
            nodes: Vec::with_capacity(positions.len() * 2),
            entries: Vec::with_capacity(positions.len()),
            root: None,
        };
        if positions.is_empty() {
            return Ok(tree);
        }

        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for k in 0..dim {
            min[k] = f64::INFINITY;
            max[k] = f64::NEG_INFINITY;
        }
        for p in positions {
            for k in 0..dim {
                min[k] = min[k].min(p[k]);
                max[k] = max[k].max(p[k]);
            }
        }

        let mut lower = [0.0; 3];
        for k in 0..dim {
            lower[k] = min[k].floor();
        }
        let mut size = 1.0;
        for k in 0..dim {
            while lower[k] + size <= max[k] {
                size *= 2.0;
            }
        }
        let mut upper = [0.0; 3];
        for k in 0..dim {
            upper[k] = lower[k] + size;
        }

        let indices: Vec<usize> = (0..positions.len()).collect();
        let root = tree.build_node(positions, indices, lower, upper, 0);
        tree.root = Some(root);
        Ok(tree)
    }

    fn build_node(
        &mut self,
        positions: &[[f64; 3]],
        indices: Vec<usize>,
        lower: [f64; 3],
        upper: [f64; 3],
        depth: usize,
    ) -> usize {
        let coincident = {
            let head = positions[indices[0]];
            indices.iter().all(|&i| {
                (0..self.dim).all(|k| positions[i][k] == head[k])
            })
        };

        if indices.len() == 1 || coincident || depth >= MAX_DEPTH {
            let first = self.entries.len();
            let count = indices.len();
            self.entries.extend(indices);
            self.nodes.push(TreeNode {
                kind: NodeKind::Leaf { first, count },
                lower,
                upper,
                charge: 0.0,
                centroid: [0.0; 3],
            });
            return self.nodes.len() - 1;
        }

        let mut mid = [0.0; 3];
        for k in 0..self.dim {
            mid[k] = 0.5 * (lower[k] + upper[k]);
        }

        let arity = 1usize << self.dim;
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); arity];
        for i in indices {
            let mut code = 0;
            for k in 0..self.dim {
                if positions[i][k] >= mid[k] {
                    code |= 1 << k;
                }
            }
            buckets[code].push(i);
        }

        let mut children = [None; 8];
        for (code, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let mut child_lower = lower;
            let mut child_upper = upper;
            for k in 0..self.dim {
                if code & (1 << k) != 0 {
                    child_lower[k] = mid[k];
                } else {
                    child_upper[k] = mid[k];
                }
            }
            children[code] = Some(self.build_node(positions, bucket, child_lower, child_upper, depth + 1));
        }

        self.nodes.push(TreeNode {
            kind: NodeKind::Internal { children },
            lower,
            upper,
            charge: 0.0,
            centroid: [0.0; 3],
        });
        self.nodes.len() - 1
    }

    /// Returns the spatial dimension the tree was built for.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the arena index of the root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Returns the number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    /// Returns a mutable reference to the node at `index`.
    pub fn node_mut(&mut self, index: usize) -> &mut TreeNode {
        &mut self.nodes[index]
    }

    /// Returns the particle indices owned by a leaf node, or an empty slice
    /// for internal nodes.
    pub fn leaf_entries(&self, index: usize) -> &[usize] {
        match self.nodes[index].kind {
            NodeKind::Leaf { first, count } => &self.entries[first..first + count],
            NodeKind::Internal { .. } => &[],
        }
    }

    /// Visits every node bottom-up exactly once (children strictly before
    /// their parent), handing the visitor the tree and the node index so it
    /// may read child results and write node fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_magnetics::magnetics::SpatialTree;
    ///
    /// let positions = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
    /// let mut tree = SpatialTree::build(2, &positions).unwrap();
    /// let mut visited = 0;
    /// tree.visit_post_order(|_, _| visited += 1);
    /// assert_eq!(visited, tree.len());
    /// ```
    pub fn visit_post_order<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut SpatialTree, usize),
    {
        let order = self.post_order_indices();
        for index in order {
            visitor(self, index);
        }
    }

    fn post_order_indices(&self) -> Vec<usize> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let mut stack = vec![root];
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(index) = stack.pop() {
            order.push(index);
            if let NodeKind::Internal { children } = self.nodes[index].kind {
                for child in children.into_iter().flatten() {
                    stack.push(child);
                }
            }
        }
        // Parents were emitted before their subtrees; reversing puts every
        // child ahead of its parent.
        order.reverse();
        order
    }

    /// Visits nodes top-down, handing the visitor the tree, the node index
    /// and the per-axis low/high extent of the node's region. A `true` return
    /// treats the node as terminal (no descent); `false` recurses into its
    /// children. Leaves never recurse regardless of the return value.
    pub fn visit_pre_order<F>(&self, mut visitor: F)
    where
        F: FnMut(&SpatialTree, usize, &[f64; 3], &[f64; 3]) -> bool,
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let (lower, upper) = (self.nodes[index].lower, self.nodes[index].upper);
            if visitor(self, index, &lower, &upper) {
                continue;
            }
            if let NodeKind::Internal { children } = self.nodes[index].kind {
                for child in children.into_iter().flatten() {
                    stack.push(child);
                }
            }
        }
    }
}
