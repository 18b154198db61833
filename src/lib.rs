//! Scalar reverse-mode automatic differentiation over a shared expression
//! graph.
//!
//! Expressions are built from [`Node`] handles with eager forward evaluation;
//! [`Node::backward`] differentiates an expression with respect to every
//! non-constant node reachable from it.
//!
//! ```
//! use scalargrad::Node;
//!
//! let a = Node::new(2.);
//! let b = Node::new(3.);
//! let y = &(&a * &b) + 1.0;
//! y.backward();
//! assert_eq!(a.gradient().unwrap().value(), 3.);
//! assert_eq!(b.gradient().unwrap().value(), 2.);
//! ```

pub mod error;
mod node;
mod ops;

pub use error::{Error, Result};
pub use node::Node;
pub use ops::{div, Operand};
