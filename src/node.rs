use std::{cell::RefCell, collections::HashMap, fmt, io::Write, rc::Rc};

use crate::error::{Error, Result};
use crate::ops::Operand;

/// Structure of a node: what produced it and which operands it holds.
/// Operand order is significant for `Sub` (minuend, subtrahend) and
/// `Div` (numerator, denominator).
#[derive(Clone, Debug)]
enum Expr {
    /// An independent input leaf.
    Leaf,
    /// A bare float promoted into the graph; never a differentiation target.
    Constant,
    Add(Node, Node),
    Sub(Node, Node),
    Mul(Node, Node),
    Div(Node, Node),
    Exp(Node),
    Log(Node),
    Tanh(Node),
}

#[derive(Debug)]
struct NodePayload {
    expr: Expr,
    value: f64,
    gradient: RefCell<Option<Node>>,
}

impl NodePayload {
    fn new(expr: Expr, value: f64) -> Self {
        Self {
            expr,
            value,
            gradient: RefCell::new(None),
        }
    }
}

/// A value in the expression graph: an input leaf, a promoted constant, or
/// the result of applying an operation to other nodes.
///
/// Nodes are cheaply clonable handles sharing one payload, so the same node
/// may appear as an operand of several expressions and the graph forms a DAG.
/// The forward value is computed eagerly when the node is built and never
/// changes afterward; the only mutable slot is the gradient written by
/// [`Node::backward`].
#[derive(Clone, Debug)]
pub struct Node(Rc<NodePayload>);

impl Node {
    /// Create an input leaf holding `value`.
    pub fn new(value: f64) -> Node {
        Self::from_expr(Expr::Leaf, value)
    }

    /// Create a constant node. Constants are what bare float operands promote
    /// into; they never receive a gradient. Each call allocates its own node.
    pub fn constant(value: f64) -> Node {
        Self::from_expr(Expr::Constant, value)
    }

    fn from_expr(expr: Expr, value: f64) -> Node {
        Node(Rc::new(NodePayload::new(expr, value)))
    }

    /// The forward value, fixed at construction.
    pub fn value(&self) -> f64 {
        self.0.value
    }

    /// The gradient recorded by the most recent [`Node::backward`] pass that
    /// visited this node, if any.
    pub fn gradient(&self) -> Option<Node> {
        self.0.gradient.borrow().clone()
    }

    pub(crate) fn add_node(&self, rhs: &Node) -> Node {
        Self::from_expr(
            Expr::Add(self.clone(), rhs.clone()),
            self.value() + rhs.value(),
        )
    }

    pub(crate) fn sub_node(&self, rhs: &Node) -> Node {
        Self::from_expr(
            Expr::Sub(self.clone(), rhs.clone()),
            self.value() - rhs.value(),
        )
    }

    pub(crate) fn mul_node(&self, rhs: &Node) -> Node {
        Self::from_expr(
            Expr::Mul(self.clone(), rhs.clone()),
            self.value() * rhs.value(),
        )
    }

    /// Divide this node by `rhs`, which may be a node or a bare float.
    ///
    /// Fails with [`Error::DivisionByZero`] when the denominator's value is
    /// exactly zero. The check happens here, at construction; a successfully
    /// built `Div` node can always be differentiated.
    pub fn div(&self, rhs: impl Operand) -> Result<Node> {
        let rhs = rhs.into_node();
        if rhs.value() == 0. {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::from_expr(
            Expr::Div(self.clone(), rhs.clone()),
            self.value() / rhs.value(),
        ))
    }

    /// e raised to this node's value.
    pub fn exp(&self) -> Node {
        Self::from_expr(Expr::Exp(self.clone()), self.value().exp())
    }

    /// Natural logarithm. Fails with [`Error::Domain`] when this node's value
    /// is not strictly positive.
    pub fn log(&self) -> Result<Node> {
        if self.value() <= 0. {
            return Err(Error::Domain(self.value()));
        }
        Ok(Self::from_expr(Expr::Log(self.clone()), self.value().ln()))
    }

    /// Hyperbolic tangent.
    pub fn tanh(&self) -> Node {
        Self::from_expr(Expr::Tanh(self.clone()), self.value().tanh())
    }

    fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    fn is_constant(&self) -> bool {
        matches!(self.0.expr, Expr::Constant)
    }

    /// One-time derivation of this expression with respect to `wrt`, by
    /// structural recursion. Nodes are compared by identity, not value, so
    /// shared operands are handled correctly. Does not touch gradient slots.
    ///
    /// The recursion revisits shared subexpressions once per path from the
    /// root, so its cost can grow steeply on graphs with heavy sharing.
    pub fn derive(&self, wrt: &Node) -> f64 {
        use Expr::*;
        if self.id() == wrt.id() {
            return 1.;
        }
        match &self.0.expr {
            Leaf | Constant => 0.,
            Add(lhs, rhs) => lhs.derive(wrt) + rhs.derive(wrt),
            Sub(lhs, rhs) => lhs.derive(wrt) - rhs.derive(wrt),
            Mul(lhs, rhs) => lhs.derive(wrt) * rhs.value() + rhs.derive(wrt) * lhs.value(),
            Div(lhs, rhs) => {
                (lhs.derive(wrt) * rhs.value() - rhs.derive(wrt) * lhs.value())
                    / (rhs.value() * rhs.value())
            }
            Exp(term) => self.0.value * term.derive(wrt),
            Log(term) => term.derive(wrt) / term.value(),
            // Legacy behavior: the inner derivative is not applied, so this
            // arm is exact only when tanh is taken directly of `wrt`.
            Tanh(term) => 1. - term.value().tanh().powi(2),
        }
    }

    /// Differentiate this expression with respect to every non-constant node
    /// reachable from it (including itself), storing each result in that
    /// node's gradient slot as a fresh leaf node. Previous gradients are
    /// overwritten.
    pub fn backward(&self) {
        let mut targets = HashMap::new();
        self.collect_targets(&mut targets);
        log::debug!("backward pass over {} target(s)", targets.len());
        for target in targets.values() {
            let grad = self.derive(target);
            log::trace!("d/d({}) = {}", target.label(), grad);
            *target.0.gradient.borrow_mut() = Some(Node::new(grad));
        }
    }

    /// Gather the identity-deduplicated set of differentiation targets:
    /// every reachable node that is not a promoted constant.
    fn collect_targets(&self, targets: &mut HashMap<usize, Node>) {
        use Expr::*;
        if targets.contains_key(&self.id()) {
            return;
        }
        if !self.is_constant() {
            targets.insert(self.id(), self.clone());
        }
        match &self.0.expr {
            Leaf | Constant => (),
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) => {
                lhs.collect_targets(targets);
                rhs.collect_targets(targets);
            }
            Exp(term) | Log(term) | Tanh(term) => term.collect_targets(targets),
        }
    }

    fn label(&self) -> String {
        use Expr::*;
        match &self.0.expr {
            Leaf => format!("Var({})", self.0.value),
            Constant => format!("Scalar({})", self.0.value),
            Add(..) => "+".to_string(),
            Sub(..) => "-".to_string(),
            Mul(..) => "*".to_string(),
            Div(..) => "/".to_string(),
            Exp(_) => "exp".to_string(),
            Log(_) => "log".to_string(),
            Tanh(_) => "tanh".to_string(),
        }
    }

    /// Write graphviz dot file to the given writer.
    pub fn dot(&self, writer: &mut impl Write) -> std::io::Result<()> {
        let mut map = HashMap::new();
        self.accum(&mut map);
        writeln!(writer, "digraph G {{\nrankdir=\"LR\";")?;
        for (id, (node, _)) in &map {
            let grad = node
                .gradient()
                .map_or_else(|| "-".to_string(), |g| g.value().to_string());
            writeln!(
                writer,
                "a{} [label=\"{} \\nvalue:{}, grad:{}\"];",
                *id,
                node.label(),
                node.value(),
                grad
            )?;
        }
        for (id, (_, operands)) in &map {
            for oid in operands {
                writeln!(writer, "a{} -> a{};", oid, *id)?;
            }
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    fn accum(&self, map: &mut HashMap<usize, (Node, Vec<usize>)>) {
        use Expr::*;
        let operands = match &self.0.expr {
            Leaf | Constant => vec![],
            Add(lhs, rhs) | Sub(lhs, rhs) | Mul(lhs, rhs) | Div(lhs, rhs) => {
                lhs.accum(map);
                rhs.accum(map);
                vec![lhs.id(), rhs.id()]
            }
            Exp(term) | Log(term) | Tanh(term) => {
                term.accum(map);
                vec![term.id()]
            }
        };
        map.insert(self.id(), (self.clone(), operands));
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match &self.0.expr {
            Leaf => write!(f, "Var({})", self.0.value),
            Constant => write!(f, "Scalar({})", self.0.value),
            Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Mul(lhs, rhs) => write!(f, "{} * {}", lhs, rhs),
            Div(lhs, rhs) => write!(f, "{} / {}", lhs, rhs),
            Exp(term) => write!(f, "exp({})", term),
            Log(term) => write!(f, "log({})", term),
            Tanh(term) => write!(f, "tanh({})", term),
        }
    }
}
