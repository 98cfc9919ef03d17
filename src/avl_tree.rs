use std::cmp::Ordering;

/// Owned link to a subtree
type Link<K> = Option<Box<Node<K>>>;

/// A node of the AVL tree
#[derive(Debug, Clone)]
struct Node<K> {
    /// The key stored in this node
    key: K,
    /// Keys smaller than `key`
    left: Link<K>,
    /// Keys greater than `key`
    right: Link<K>,
    /// Cached height of the subtree rooted here (a leaf has height 1)
    height: i32,
}

/// Which way an insertion went at the root of the subtree it was applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descent {
    /// The subtree was empty and the new key became its root
    Placed,
    /// The key was inserted below the left child
    Left,
    /// The key was inserted below the right child
    Right,
    /// The key was already present
    Duplicate,
}

impl<K> Node<K> {
    /// Creates a leaf holding `key`
    fn leaf(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Recomputes the cached height from the children
    fn update_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)).saturating_add(1);
    }

    /// Height of the left subtree minus height of the right subtree
    fn balance(&self) -> i32 {
        height(&self.left).saturating_sub(height(&self.right))
    }
}

/// Height of a possibly absent subtree
fn height<K>(link: &Link<K>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Balance factor of a possibly absent subtree
fn balance<K>(link: &Link<K>) -> i32 {
    link.as_ref().map_or(0, |node| node.balance())
}

/// Rotates the subtree right, promoting the left child.
///
/// A node without a left child is returned unchanged.
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Rotates the subtree left, promoting the right child.
///
/// A node without a right child is returned unchanged.
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Inserts `key` into the subtree and returns the new subtree root.
fn insert_node<K: Ord>(link: Link<K>, key: K) -> (Box<Node<K>>, Descent) {
    let Some(mut node) = link else {
        return (Node::leaf(key), Descent::Placed);
    };

    // `child` records which way the key went at the child we descended into.
    // When the node ends up unbalanced the child was not rotated itself, so
    // this is the same as comparing the key with the child's key.
    let (descent, child) = match key.cmp(&node.key) {
        Ordering::Equal => return (node, Descent::Duplicate),
        Ordering::Less => {
            let (left, child) = insert_node(node.left.take(), key);
            node.left = Some(left);
            (Descent::Left, child)
        }
        Ordering::Greater => {
            let (right, child) = insert_node(node.right.take(), key);
            node.right = Some(right);
            (Descent::Right, child)
        }
    };
    if child == Descent::Duplicate {
        return (node, Descent::Duplicate);
    }

    node.update_height();
    let balance = node.balance();

    if balance > 1 && child == Descent::Left {
        return (rotate_right(node), descent);
    }
    if balance < -1 && child == Descent::Right {
        return (rotate_left(node), descent);
    }
    if balance > 1 && child == Descent::Right {
        node.left = node.left.take().map(rotate_left);
        return (rotate_right(node), descent);
    }
    if balance < -1 && child == Descent::Left {
        node.right = node.right.take().map(rotate_right);
        return (rotate_left(node), descent);
    }

    (node, descent)
}

/// Restores the AVL invariant at `node` after a removal below it, using the
/// balance factors of its children.
fn rebalance_after_removal<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if self::balance(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if self::balance(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Detaches the minimum key of the subtree, rebalancing on the way back up.
///
/// Returns the remaining subtree and the removed key.
fn take_min<K>(mut node: Box<Node<K>>) -> (Link<K>, K) {
    match node.left.take() {
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance_after_removal(node)), min)
        }
    }
}

/// Removes `key` from the subtree and returns the new subtree root.
fn delete_node<K: Ord>(link: Link<K>, key: &K, removed: &mut bool) -> Link<K> {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = delete_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = delete_node(node.right.take(), key, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, child) | (child, None) => return child,
                (left, Some(right)) => {
                    // Two children: the in-order successor's key moves up
                    // here and the successor leaves the right subtree.
                    let (rest, successor) = take_min(right);
                    node.key = successor;
                    node.left = left;
                    node.right = rest;
                }
            }
        }
    }

    Some(rebalance_after_removal(node))
}

/// A height-balanced binary search tree holding a set of keys.
///
/// After every insert or delete the heights of the two subtrees of any node
/// differ by at most one, so all operations run in `O(log n)`.
///
/// Duplicate inserts and deletes of absent keys are no-ops.
#[derive(Debug, Clone)]
pub struct AvlTree<K> {
    /// Root of the tree
    root: Link<K>,
    /// Number of keys in the tree
    len: usize,
}

impl<K: Ord> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> AvlTree<K> {
    /// Creates an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Inserts `key`, rebalancing along the insertion path.
    ///
    /// Returns `false` and leaves the tree untouched if the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let (root, descent) = insert_node(self.root.take(), key);
        self.root = Some(root);
        if descent == Descent::Duplicate {
            return false;
        }
        self.len = self.len.saturating_add(1);
        true
    }

    /// Removes `key`, rebalancing along the deletion path.
    ///
    /// Returns `false` if the key was not present.
    pub fn delete(&mut self, key: &K) -> bool {
        let mut removed = false;
        self.root = delete_node(self.root.take(), key, &mut removed);
        if removed {
            self.len = self.len.saturating_sub(1);
        }
        removed
    }

    /// Returns true if the tree holds `key`
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Returns the number of keys in the tree
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty, 1 for a single key
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }
}

#[cfg(test)]
impl<K: Ord + Clone> AvlTree<K> {
    /// Keys in ascending order
    pub(crate) fn keys(&self) -> Vec<K> {
        /// In-order walk
        fn walk<K: Clone>(link: &Link<K>, out: &mut Vec<K>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(node.key.clone());
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Asserts key order, cached heights and balance factors; returns the height
    pub(crate) fn assert_invariants(&self) -> i32 {
        /// Checks a subtree and returns its real height
        fn check<K>(link: &Link<K>) -> i32 {
            let Some(node) = link else {
                return 0;
            };
            let left = check(&node.left);
            let right = check(&node.right);
            assert!((left - right).abs() <= 1, "node out of balance: {left} vs {right}");
            assert_eq!(node.height, 1 + left.max(right), "stale cached height");
            node.height
        }
        let keys = self.keys();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "keys out of order");
        assert_eq!(keys.len(), self.len);
        check(&self.root)
    }
}
