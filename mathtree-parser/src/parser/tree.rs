use crate::grammar::Symbol;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The index of a node in a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

/// A node of the raw, grammar-shaped syntax tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntaxNode {
    /// The grammar symbol this node was produced for.
    pub symbol: Symbol,

    /// The text of the token this node matched, for terminal nodes.
    pub lexeme: Option<String>,

    /// The region of the source this node covers.
    pub span: Range<usize>,

    /// The node this one was attached to while parsing.
    parent: Option<NodeId>,

    /// The children of the node, in source order.
    children: Vec<NodeId>,
}

/// A raw syntax tree, stored as an arena of nodes.
///
/// Nodes are only appended while parsing; once the tree is returned from the parser it is
/// read-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node for `symbol` as the last child of `parent` (or as the root if there is no
    /// parent), returning its index.
    pub(crate) fn push(
        &mut self,
        parent: Option<NodeId>,
        symbol: Symbol,
        lexeme: Option<String>,
        span: Range<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode { symbol, lexeme, span, parent, children: Vec::new() });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Widens the span of every inner node to cover its children. Children are always created
    /// after their parents, so visiting nodes in reverse creation order sees children first.
    pub(crate) fn finish_spans(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let covered = node.children
                .iter()
                .map(|child| self.nodes[child.0].span.clone())
                .filter(|span| !span.is_empty())
                .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end));
            if let Some(span) = covered {
                self.nodes[i].span = span;
            }
        }
    }

    /// Returns the root of the tree, or [`None`] if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        (!self.nodes.is_empty()).then(|| NodeRef { tree: self, id: NodeId(0) })
    }

    /// Returns the node with the given index.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| NodeRef { tree: self, id })
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A borrowed view of one node of a [`SyntaxTree`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> NodeRef<'tree> {
    fn node(&self) -> &'tree SyntaxNode {
        &self.tree.nodes[self.id.0]
    }

    /// Returns the index of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the grammar symbol of the node.
    pub fn symbol(&self) -> &'tree Symbol {
        &self.node().symbol
    }

    /// Returns the matched token text, for terminal nodes.
    pub fn lexeme(&self) -> Option<&'tree str> {
        self.node().lexeme.as_deref()
    }

    /// Returns the region of the source the node covers.
    pub fn span(&self) -> Range<usize> {
        self.node().span.clone()
    }

    /// Returns the parent of the node.
    pub fn parent(&self) -> Option<NodeRef<'tree>> {
        self.node().parent.map(|id| NodeRef { tree: self.tree, id })
    }

    /// Returns the children of the node, in source order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'tree>> + 'tree {
        let tree = self.tree;
        self.node().children.iter().map(move |&id| NodeRef { tree, id })
    }

    /// Returns the child at the given index.
    pub fn child(&self, index: usize) -> Option<NodeRef<'tree>> {
        self.node().children.get(index).map(|&id| NodeRef { tree: self.tree, id })
    }

    /// Returns true if the node derived the empty string.
    pub fn is_empty(&self) -> bool {
        self.node().children.is_empty() && self.node().lexeme.is_none()
    }

    /// Writes the subtree rooted at this node, one node per line.
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.symbol(), indent = depth * 2)?;
        if let Some(lexeme) = self.lexeme() {
            write!(f, " `{}`", lexeme)?;
        }
        writeln!(f)?;
        for child in self.children() {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => root.write_indented(f, 0),
            None => Ok(()),
        }
    }
}
