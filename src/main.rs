use scalargrad::{div, Node};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (a, p) = build_model()?;
    println!("p = {p}");
    println!("p.value = {}", p.value());

    let loss = p.log()?;
    println!("loss = {loss}");
    println!("loss.value = {}", loss.value());

    loss.backward();
    println!("d(loss)/d(a) = {}", a.gradient().unwrap().value());
    println!("d(loss)/d(p) = {}", p.gradient().unwrap().value());

    loss.dot(&mut std::io::stdout())?;
    Ok(())
}

/// Sigmoid of -3a, built from primitive operations.
fn build_model() -> scalargrad::Result<(Node, Node)> {
    let a = Node::new(0.);
    let e = (&a * -3.0).exp();
    let denom = &e + 1.0;
    let p = div(1.0, &denom)?;
    Ok((a, p))
}
