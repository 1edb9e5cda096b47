//! Module to build the static Huffman tree.
//!
//! Nodes live in a pool and refer to their sons by index.  Leaves are stored
//! first, one for each symbol in table order, then the branches in the order
//! they were created, so the root is always the last node.
//!
//! The merge loop pulls the two lightest nodes from a min-heap keyed by
//! `(frequency,index)`.  The index makes the key unique, which fixes the
//! outcome of ties: a leaf beats a branch, an earlier leaf beats a later one,
//! and an older branch beats a newer one.  The first node pulled becomes the
//! left son.

use std::cmp::Reverse;
use std::collections::{BinaryHeap,HashMap};
use std::hash::Hash;
use crate::frequency::FrequencyTable;
use crate::Error;

/// A slot in the node pool
#[derive(Clone,Debug,PartialEq)]
pub enum Node<S> {
    Leaf {
        symbol: S,
        freq: u64
    },
    Branch {
        /// sum of the son frequencies
        freq: u64,
        left: usize,
        right: usize
    }
}

impl<S> Node<S> {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Branch { freq, .. } => *freq
        }
    }
}

/// Optimal prefix tree for a given frequency table
#[derive(Clone,Debug)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    /// map from symbols to leaves
    leaf_map: HashMap<S,usize>,
    root: usize
}

impl<S: Copy + Eq + Hash> HuffmanTree<S> {
    /// Run the greedy merge.  An empty table is an error, a table with one
    /// entry gives a tree that is a single leaf.
    pub fn build(freq: &FrequencyTable<S>) -> Result<Self,Error> {
        if freq.is_empty() {
            log::debug!("refusing to build a tree with no symbols");
            return Err(Error::EmptyInput);
        }
        // every branch weight is bounded by the total
        if freq.checked_total().is_none() {
            log::debug!("symbol counts overflow");
            return Err(Error::CountOverflow);
        }
        let leaves = freq.len();
        let mut nodes = Vec::with_capacity(2*leaves - 1);
        let mut leaf_map = HashMap::new();
        let mut heap = BinaryHeap::with_capacity(leaves);
        for (symbol,count) in freq.iter() {
            leaf_map.insert(symbol,nodes.len());
            heap.push(Reverse((count,nodes.len())));
            nodes.push(Node::Leaf { symbol, freq: count });
        }
        while let (Some(Reverse((f1,left))),Some(Reverse((f2,right)))) = (heap.pop(),heap.pop()) {
            let parent = nodes.len();
            log::trace!("merge {} ({}) and {} ({}) into {}",left,f1,right,f2,parent);
            nodes.push(Node::Branch { freq: f1 + f2, left, right });
            heap.push(Reverse((f1 + f2,parent)));
        }
        // the loop exits after popping the lone survivor, which is the root
        let root = nodes.len() - 1;
        log::debug!("tree has {} leaves and {} branches",leaves,nodes.len() - leaves);
        Ok(Self {
            nodes,
            leaf_map,
            root
        })
    }
    /// index of the root node
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn node(&self,idx: usize) -> &Node<S> {
        &self.nodes[idx]
    }
    /// total weight, i.e., number of symbols in the stream the tree was built from
    pub fn frequency(&self) -> u64 {
        self.nodes[self.root].freq()
    }
    pub fn leaf_count(&self) -> usize {
        self.leaf_map.len()
    }
    pub fn branch_count(&self) -> usize {
        self.nodes.len() - self.leaf_map.len()
    }
    /// tree is a lone leaf, only happens for a one-symbol alphabet
    pub fn is_degenerate(&self) -> bool {
        self.nodes.len() == 1
    }
    /// depth of the leaf holding `symbol`, root is at depth 0
    pub fn depth_of(&self,symbol: &S) -> Option<usize> {
        let target = *self.leaf_map.get(symbol)?;
        self.depths().into_iter().find(|(idx,_)| *idx == target).map(|(_,d)| d)
    }
    pub fn max_depth(&self) -> usize {
        self.depths().into_iter().map(|(_,d)| d).max().unwrap_or(0)
    }
    /// Σ frequency × depth over all leaves, the quantity the merge minimizes
    pub fn weighted_path_length(&self) -> u64 {
        self.depths().into_iter().map(|(idx,d)| self.nodes[idx].freq() * d as u64).sum()
    }
    /// (leaf index,depth) for every leaf
    fn depths(&self) -> Vec<(usize,usize)> {
        let mut ans = Vec::with_capacity(self.leaf_map.len());
        let mut stack = vec![(self.root,0)];
        while let Some((idx,depth)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => ans.push((idx,depth)),
                Node::Branch { left, right, .. } => {
                    stack.push((*right,depth + 1));
                    stack.push((*left,depth + 1));
                }
            }
        }
        ans
    }
}

// *************** TESTS *****************

#[cfg(test)]
fn textbook_table() -> FrequencyTable<char> {
    FrequencyTable::from_pairs([('a',5),('b',9),('c',12),('d',13),('e',16),('f',45)])
}

#[cfg(test)]
fn check_sums<S>(tree: &HuffmanTree<S>,idx: usize) {
    if let Node::Branch { freq, left, right } = &tree.nodes[idx] {
        assert_eq!(*freq,tree.nodes[*left].freq() + tree.nodes[*right].freq());
        check_sums(tree,*left);
        check_sums(tree,*right);
    }
}

#[test]
fn textbook_tree_is_optimal() {
    let tree = HuffmanTree::build(&textbook_table()).expect("build failed");
    assert_eq!(tree.weighted_path_length(),224);
    assert_eq!(tree.frequency(),100);
    assert_eq!(tree.max_depth(),4);
    assert_eq!(tree.depth_of(&'f'),Some(1));
    assert_eq!(tree.depth_of(&'c'),Some(3));
    assert_eq!(tree.depth_of(&'a'),Some(4));
    assert_eq!(tree.depth_of(&'z'),None);
    check_sums(&tree,tree.root());
}

#[test]
fn leaves_and_branches() {
    let tree = HuffmanTree::build(&textbook_table()).expect("build failed");
    assert_eq!(tree.leaf_count(),6);
    assert_eq!(tree.branch_count(),5);
    assert_eq!(tree.root(),10);
    assert!(!tree.is_degenerate());
}

#[test]
fn ties_break_by_index() {
    // four equal weights: leaves 0,1 merge first, then 2,3, then the two branches
    let tree = HuffmanTree::build(&FrequencyTable::analyze("abcd".chars())).expect("build failed");
    assert_eq!(tree.node(4),&Node::Branch { freq: 2, left: 0, right: 1 });
    assert_eq!(tree.node(5),&Node::Branch { freq: 2, left: 2, right: 3 });
    assert_eq!(tree.node(6),&Node::Branch { freq: 4, left: 4, right: 5 });
    // a leaf of weight 2 is pulled before a branch of weight 2
    let tree = HuffmanTree::build(&FrequencyTable::analyze("abcc".chars())).expect("build failed");
    assert_eq!(tree.node(3),&Node::Branch { freq: 2, left: 0, right: 1 });
    assert_eq!(tree.node(4),&Node::Branch { freq: 4, left: 2, right: 3 });
}

#[test]
fn build_is_reproducible() {
    let text = "she sells sea shells by the sea shore";
    let t1 = HuffmanTree::build(&FrequencyTable::analyze(text.chars())).expect("build failed");
    let t2 = HuffmanTree::build(&FrequencyTable::analyze(text.chars())).expect("build failed");
    assert_eq!(t1.nodes,t2.nodes);
}

#[test]
fn single_symbol_tree() {
    let tree = HuffmanTree::build(&FrequencyTable::analyze("aaaa".chars())).expect("build failed");
    assert!(tree.is_degenerate());
    assert_eq!(tree.leaf_count(),1);
    assert_eq!(tree.branch_count(),0);
    assert_eq!(tree.depth_of(&'a'),Some(0));
    assert_eq!(tree.weighted_path_length(),0);
    assert_eq!(tree.node(tree.root()),&Node::Leaf { symbol: 'a', freq: 4 });
}

#[test]
fn overflowing_counts_are_an_error() {
    let freq = FrequencyTable::from_pairs([('a',u64::MAX),('b',1)]);
    assert_eq!(HuffmanTree::build(&freq).unwrap_err(),Error::CountOverflow);
    let freq = FrequencyTable::from_pairs([('a',u64::MAX - 1),('b',1)]);
    assert_eq!(HuffmanTree::build(&freq).expect("build failed").frequency(),u64::MAX);
}

#[test]
fn empty_table_is_an_error() {
    let freq = FrequencyTable::analyze("".chars());
    assert_eq!(HuffmanTree::build(&freq).unwrap_err(),Error::EmptyInput);
}
