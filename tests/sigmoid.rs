//! End-to-end sigmoid/log-loss scenario, including gradients of every
//! intermediate node.

use approx::assert_relative_eq;
use scalargrad::{div, Node};

#[test]
fn sigmoid_log_loss_gradients() {
    let a = Node::new(0.);
    let m = &a * -3.0;
    let e = m.exp();
    let denom = &e + 1.0;
    let p = div(1.0, &denom).unwrap();
    let loss = p.log().unwrap();

    assert_eq!(p.value(), 0.5);
    assert_relative_eq!(loss.value(), -0.6931471805599453);

    loss.backward();
    assert_relative_eq!(a.gradient().unwrap().value(), 1.5);
    assert_eq!(p.gradient().unwrap().value(), 2.);
    assert_eq!(denom.gradient().unwrap().value(), -0.5);
    assert_eq!(e.gradient().unwrap().value(), -0.5);
    assert_eq!(m.gradient().unwrap().value(), -0.5);
    assert_eq!(loss.gradient().unwrap().value(), 1.);
}

#[test]
fn sigmoid_renders_its_structure() {
    let a = Node::new(0.);
    let e = (&a * -3.0).exp();
    let denom = &e + 1.0;
    let p = div(1.0, &denom).unwrap();
    assert_eq!(
        p.to_string(),
        "Scalar(1) / (exp(Var(0) * Scalar(-3)) + Scalar(1))"
    );
}
