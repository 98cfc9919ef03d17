use std::{cmp::Ordering, fmt};

/// Owned link to a subtree
type Link<K> = Option<Box<Node<K>>>;

/// A node of the splay tree
struct Node<K> {
    /// The key stored in this node
    key: K,
    /// Keys smaller than `key`
    left: Link<K>,
    /// Keys greater than `key`
    right: Link<K>,
}

impl<K> Node<K> {
    /// Creates a node holding `key` with the given children
    fn boxed(key: K, left: Link<K>, right: Link<K>) -> Box<Self> {
        Box::new(Self { key, left, right })
    }
}

/// Promotes the left child. A node without one is returned unchanged.
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    pivot.right = Some(node);
    pivot
}

/// Promotes the right child. A node without one is returned unchanged.
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    pivot.left = Some(node);
    pivot
}

/// Brings `key` to the root of the subtree, or the last node on its search
/// path when it is absent.
///
/// Works top-down in a loop. Each step looks two levels ahead: a grandchild
/// on the same side as the child is a zig-zig and the child is rotated up
/// first; otherwise (zig or zig-zag) the current root is split off as is.
/// Split-off nodes are collected on the side of `key` they belong to and
/// hung back below the final root once the walk stops.
fn splay<K: Ord>(mut root: Box<Node<K>>, key: &K) -> Box<Node<K>> {
    // Nodes smaller than `key`, each to become the right child of the previous one
    let mut smaller: Vec<Box<Node<K>>> = Vec::new();
    // Nodes larger than `key`, each to become the left child of the previous one
    let mut larger: Vec<Box<Node<K>>> = Vec::new();

    loop {
        match key.cmp(&root.key) {
            Ordering::Equal => break,
            Ordering::Less => {
                if root.left.as_ref().is_some_and(|child| *key < child.key) {
                    root = rotate_right(root);
                }
                let Some(left) = root.left.take() else {
                    break;
                };
                larger.push(root);
                root = left;
            }
            Ordering::Greater => {
                if root.right.as_ref().is_some_and(|child| *key > child.key) {
                    root = rotate_left(root);
                }
                let Some(right) = root.right.take() else {
                    break;
                };
                smaller.push(root);
                root = right;
            }
        }
    }

    let mut left = root.left.take();
    while let Some(mut node) = smaller.pop() {
        node.right = left;
        left = Some(node);
    }
    let mut right = root.right.take();
    while let Some(mut node) = larger.pop() {
        node.left = right;
        right = Some(node);
    }
    root.left = left;
    root.right = right;
    root
}

/// A self-adjusting binary search tree holding a set of keys.
///
/// Every access splays the key (or the last node on its search path) to the
/// root, so recently used keys stay near the top. No balance information is
/// stored; a single operation may cost `O(n)` but any sequence of operations
/// costs `O(log n)` amortized per operation.
///
/// Lookups restructure the tree, which is why [`SplayTree::contains`] takes
/// `&mut self`.
pub struct SplayTree<K> {
    /// Root of the tree
    root: Link<K>,
    /// Number of keys in the tree
    len: usize,
}

impl<K: Ord> Default for SplayTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<K> for SplayTree<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Clone> Clone for SplayTree<K> {
    // Rebuilt from a reversed pre-order walk, so list-shaped trees clone
    // without recursion.
    fn clone(&self) -> Self {
        let mut pre_order = Vec::with_capacity(self.len);
        let mut pending: Vec<&Node<K>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = pending.pop() {
            pre_order.push(node);
            pending.extend(node.right.as_deref());
            pending.extend(node.left.as_deref());
        }

        let mut built: Vec<Box<Node<K>>> = Vec::new();
        for node in pre_order.into_iter().rev() {
            let left = node.left.as_ref().and_then(|_| built.pop());
            let right = node.right.as_ref().and_then(|_| built.pop());
            built.push(Node::boxed(node.key.clone(), left, right));
        }

        Self {
            root: built.pop(),
            len: self.len,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for SplayTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayTree")
            .field("root", &self.root.as_ref().map(|node| &node.key))
            .field("keys", &self.in_order())
            .finish()
    }
}

impl<K> Drop for SplayTree<K> {
    // Sequential inserts build a list-shaped tree; drop it without recursion.
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl<K> SplayTree<K> {
    /// Keys in ascending order, walked with an explicit stack
    fn in_order(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root.as_deref();
        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(&node.key);
                current = node.right.as_deref();
            }
        }
        out
    }
}

impl<K: Ord> SplayTree<K> {
    /// Creates an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Inserts `key` as the new root.
    ///
    /// The tree is splayed on `key` first; if that brings an equal key to the
    /// root nothing is inserted and `false` is returned. Otherwise the old
    /// root is split around `key` and hung below the new node.
    pub fn insert(&mut self, key: K) -> bool {
        let Some(root) = self.root.take() else {
            self.root = Some(Node::boxed(key, None, None));
            self.len = 1;
            return true;
        };

        let mut root = splay(root, &key);
        let new_root = match key.cmp(&root.key) {
            Ordering::Equal => {
                self.root = Some(root);
                return false;
            }
            Ordering::Less => {
                let left = root.left.take();
                Node::boxed(key, left, Some(root))
            }
            Ordering::Greater => {
                let right = root.right.take();
                Node::boxed(key, Some(root), right)
            }
        };

        self.root = Some(new_root);
        self.len = self.len.saturating_add(1);
        true
    }

    /// Removes `key`.
    ///
    /// After splaying `key` to the root, the left subtree is splayed on the
    /// same key, which brings its maximum up with an empty right side; the
    /// old right subtree is attached there. Returns `false` if the key was
    /// not present (the tree is still splayed).
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(root) = self.root.take() else {
            return false;
        };

        let mut root = splay(root, key);
        if root.key != *key {
            self.root = Some(root);
            return false;
        }

        self.root = match root.left.take() {
            None => root.right.take(),
            Some(left) => {
                let mut new_root = splay(left, key);
                new_root.right = root.right.take();
                Some(new_root)
            }
        };
        self.len = self.len.saturating_sub(1);
        true
    }

    /// Returns true if the tree holds `key`.
    ///
    /// Splays on `key` even when it is absent.
    pub fn contains(&mut self, key: &K) -> bool {
        let Some(root) = self.root.take() else {
            return false;
        };
        let root = splay(root, key);
        let found = root.key == *key;
        self.root = Some(root);
        found
    }

    /// Returns the key at the root without restructuring the tree
    #[must_use]
    pub fn root(&self) -> Option<&K> {
        self.root.as_ref().map(|node| &node.key)
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
}

#[cfg(test)]
impl<K: Ord + Clone> SplayTree<K> {
    /// Keys in ascending order, without splaying
    pub(crate) fn keys(&self) -> Vec<K> {
        self.in_order().into_iter().cloned().collect()
    }
}
