use approx::assert_relative_eq;
use scalargrad::{div, Node};

#[test]
fn add_derivative_is_one_for_both_operands() {
    let a = Node::new(123.);
    let b = Node::new(-321.);
    let sum = &a + &b;
    assert_eq!(sum.derive(&a), 1.);
    assert_eq!(sum.derive(&b), 1.);
}

#[test]
fn mul_derivative_is_the_other_operand() {
    let a = Node::new(2.5);
    let b = Node::new(4.);
    let prod = &a * &b;
    assert_eq!(prod.derive(&a), 4.);
    assert_eq!(prod.derive(&b), 2.5);
}

#[test]
fn div_derivative_wrt_numerator() {
    let a = Node::new(3.);
    let b = Node::new(8.);
    let quot = div(&a, &b).unwrap();
    assert_relative_eq!(quot.derive(&a), 1. / 8.);
}

#[test]
fn diamond_gradients_flow_through_shared_node() {
    let a = Node::new(1.);
    let b = Node::new(3.);
    let c = Node::new(5.);
    let ab = &a + &b;
    let ac = &a + &c;
    let abac = &ab + &ac;

    abac.backward();
    assert_eq!(a.gradient().unwrap().value(), 2.);
    assert_eq!(b.gradient().unwrap().value(), 1.);
    assert_eq!(c.gradient().unwrap().value(), 1.);
}

#[test]
fn equal_values_are_distinct_targets() {
    // a and b carry the same value; identity, not value, decides which
    // target a derivative is taken against.
    let a = Node::new(1.);
    let b = Node::new(1.);
    let y = &(&a * 2.0) + &b;
    y.backward();
    assert_eq!(a.gradient().unwrap().value(), 2.);
    assert_eq!(b.gradient().unwrap().value(), 1.);
}

#[test]
fn root_is_its_own_target() {
    let a = Node::new(2.);
    let y = &a * &a;
    y.backward();
    assert_eq!(y.gradient().unwrap().value(), 1.);
    assert_eq!(a.gradient().unwrap().value(), 4.);
}

#[test]
fn intermediate_nodes_receive_gradients() {
    let a = Node::new(2.);
    let m = &a * 3.0;
    let y = &m + 1.0;
    y.backward();
    assert_eq!(m.gradient().unwrap().value(), 1.);
    assert_eq!(a.gradient().unwrap().value(), 3.);
}

#[test]
fn backward_overwrites_previous_gradients() {
    let a = Node::new(2.);
    let b = Node::new(7.);
    let prod = &a * &b;
    prod.backward();
    assert_eq!(a.gradient().unwrap().value(), 7.);
    prod.backward();
    assert_eq!(a.gradient().unwrap().value(), 7.);
    assert_eq!(b.gradient().unwrap().value(), 2.);
}

#[test]
fn constants_receive_no_gradient() {
    let a = Node::new(2.);
    let c = Node::constant(3.);
    let scaled = &a * &c;
    scaled.backward();
    assert_eq!(a.gradient().unwrap().value(), 3.);
    assert!(c.gradient().is_none());
}

#[test]
fn reflected_sub_orders_operands() {
    let a = Node::new(2.);
    let y = 10.0 - &a;
    assert_eq!(y.value(), 8.);
    assert_eq!(y.derive(&a), -1.);
}

#[test]
fn reflected_div_orders_operands() {
    let a = Node::new(4.);
    let y = div(1.0, &a).unwrap();
    assert_eq!(y.value(), 0.25);
    assert_relative_eq!(y.derive(&a), -1. / 16.);
}

#[test]
fn exp_derivative_uses_its_own_value() {
    let a = Node::new(1.5);
    let e = a.exp();
    assert_relative_eq!(e.derive(&a), 1.5f64.exp());
}

#[test]
fn log_derivative_is_reciprocal_of_operand() {
    let a = Node::new(4.);
    let l = a.log().unwrap();
    assert_relative_eq!(l.derive(&a), 0.25);
}

#[test]
fn unrelated_leaf_has_zero_derivative() {
    let a = Node::new(2.);
    let b = Node::new(3.);
    let y = &a + 1.0;
    assert_eq!(y.derive(&b), 0.);
}
