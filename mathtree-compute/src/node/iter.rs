use super::MathNode;

/// An iterator that iteratively traverses the tree of nodes in left-to-right post-order
/// (i.e. depth-first).
///
/// The factors of a product are visited numerator first, then denominator.
///
/// This iterator is created by [`MathNode::post_order_iter`].
pub struct NodeIter<'a> {
    stack: Vec<&'a MathNode>,
    last_visited: Option<&'a MathNode>,
}

impl<'a> NodeIter<'a> {
    /// Creates a new iterator that traverses the tree of nodes in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(node: &'a MathNode) -> Self {
        Self {
            stack: vec![node],
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<&'a MathNode> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given node matches the last visited node.
    fn is_last_visited(&self, node: &'a MathNode) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, node),
            None => false,
        }
    }
}

/// Returns the last child of the node, in visiting order.
fn last_child(node: &MathNode) -> Option<&MathNode> {
    match node {
        MathNode::Sum(addends) => addends.last(),
        MathNode::Product(p) => p.denominator().last().or_else(|| p.numerator().last()),
        MathNode::Power { exponent, .. } => Some(exponent),
        MathNode::Logarithm { body, .. } => Some(body),
        MathNode::Trig { body, .. } => Some(body),
        MathNode::Variable(_) | MathNode::Number(_) => None,
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a MathNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = *self.stack.last()?;
            match last_child(node) {
                None => return self.visit(),
                Some(last) if self.is_last_visited(last) => return self.visit(),
                Some(_) => (),
            }

            match node {
                MathNode::Sum(addends) => self.stack.extend(addends.iter().rev()),
                MathNode::Product(p) => {
                    self.stack.extend(p.denominator().iter().rev());
                    self.stack.extend(p.numerator().iter().rev());
                },
                MathNode::Power { base: lhs, exponent: rhs }
                    | MathNode::Logarithm { base: lhs, body: rhs } => {
                    self.stack.push(rhs);
                    self.stack.push(lhs);
                },
                MathNode::Trig { body, .. } => self.stack.push(body),
                MathNode::Variable(_) | MathNode::Number(_) => return self.visit(),
            }
        }
    }
}
