//! Operator overloads and implicit scalar promotion.
//!
//! The infallible binary operations are exposed as `std::ops` impls on node
//! references, with `f64` accepted on either side; a bare float operand is
//! promoted into a fresh constant node. Division validates its denominator,
//! so it is offered as the fallible [`div`] instead of `std::ops::Div`.

use std::ops::{Add, Mul, Sub};

use crate::error::Result;
use crate::node::Node;

/// A binary operand: a node handle, or a bare float that promotes into a
/// fresh constant node.
pub trait Operand {
    fn into_node(self) -> Node;
}

impl Operand for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl Operand for &Node {
    fn into_node(self) -> Node {
        self.clone()
    }
}

impl Operand for f64 {
    fn into_node(self) -> Node {
        Node::constant(self)
    }
}

/// Division with node-or-float operands on either side, so the reflected
/// `div(2.0, &node)` form keeps the mathematically correct operand order.
/// Fails with [`crate::Error::DivisionByZero`] when the denominator's value
/// is zero.
pub fn div(lhs: impl Operand, rhs: impl Operand) -> Result<Node> {
    lhs.into_node().div(rhs)
}

impl Add for &Node {
    type Output = Node;
    fn add(self, rhs: Self) -> Node {
        self.add_node(rhs)
    }
}

impl Add<f64> for &Node {
    type Output = Node;
    fn add(self, rhs: f64) -> Node {
        self.add_node(&Node::constant(rhs))
    }
}

impl Add<&Node> for f64 {
    type Output = Node;
    fn add(self, rhs: &Node) -> Node {
        Node::constant(self).add_node(rhs)
    }
}

impl Sub for &Node {
    type Output = Node;
    fn sub(self, rhs: Self) -> Node {
        self.sub_node(rhs)
    }
}

impl Sub<f64> for &Node {
    type Output = Node;
    fn sub(self, rhs: f64) -> Node {
        self.sub_node(&Node::constant(rhs))
    }
}

impl Sub<&Node> for f64 {
    type Output = Node;
    fn sub(self, rhs: &Node) -> Node {
        Node::constant(self).sub_node(rhs)
    }
}

impl Mul for &Node {
    type Output = Node;
    fn mul(self, rhs: Self) -> Node {
        self.mul_node(rhs)
    }
}

impl Mul<f64> for &Node {
    type Output = Node;
    fn mul(self, rhs: f64) -> Node {
        self.mul_node(&Node::constant(rhs))
    }
}

impl Mul<&Node> for f64 {
    type Output = Node;
    fn mul(self, rhs: &Node) -> Node {
        Node::constant(self).mul_node(rhs)
    }
}
