//! Version chains stored as an index-linked arena

use crate::core::types::SkillId;

/// One version inside a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNode {
    pub id: SkillId,
    pub name: String,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// Ordered versions of one skill, lowest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    nodes: Vec<ChainNode>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a version above the current tail
    pub fn push(&mut self, id: SkillId, name: impl Into<String>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(ChainNode {
            id,
            name: name.into(),
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> Option<&ChainNode> {
        self.nodes.get(idx)
    }

    pub fn head(&self) -> Option<&ChainNode> {
        self.head.and_then(|idx| self.nodes.get(idx))
    }

    pub fn tail(&self) -> Option<&ChainNode> {
        self.tail.and_then(|idx| self.nodes.get(idx))
    }

    /// Walk `next` links from the lowest version
    pub fn iter(&self) -> ChainWalk<'_> {
        ChainWalk {
            chain: self,
            cursor: self.head,
            forward: true,
        }
    }

    /// Walk `prev` links from the highest version
    pub fn iter_rev(&self) -> ChainWalk<'_> {
        ChainWalk {
            chain: self,
            cursor: self.tail,
            forward: false,
        }
    }

    /// Names lowest first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|node| node.name.as_str())
    }
}

/// Iterator following chain links in one direction
pub struct ChainWalk<'a> {
    chain: &'a Chain,
    cursor: Option<usize>,
    forward: bool,
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = &'a ChainNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.nodes.get(self.cursor?)?;
        self.cursor = if self.forward { node.next } else { node.prev };
        Some(node)
    }
}
