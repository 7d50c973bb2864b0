//! The Ising null vector.
//!
//! Builds the Virasoro vertex algebra at central charge 1/2 and finds
//! the weight-6 singular vector generating the maximal ideal — the
//! null vector of the Ising model vacuum module.
//!
//! Run: cargo run --example ising --release

use voa::{qi, qq, CentralParameters, GeneratorSpec, OpeData, VertexAlgebra};

fn main() {
    // [L_λ L] = TL + 2λL + (λ³/12)·C, with C ↦ 1/2
    let gens = vec![GeneratorSpec::even("L", qi(2)), GeneratorSpec::central("C")];
    let mut ope = OpeData::new();
    ope.set("L", "L", 0, &[("L", 1, qi(1))]);
    ope.set("L", "L", 1, &[("L", 0, qi(2))]);
    ope.set("L", "L", 3, &[("C", 0, qq(1, 2))]);
    let mut cp = CentralParameters::new();
    cp.set("C", qq(1, 2));
    let v = VertexAlgebra::new(&gens, &ope, cp).expect("valid algebra data");

    println!("graded dimensions up to weight 8:");
    let dims = v.hilbert_series(8).expect("graded algebra");
    for (n, d) in dims.iter().enumerate() {
        println!("  dim V_{n} = {d}");
    }

    println!("\nsearching for singular vectors of weight 6 ...");
    let singular = v.find_singular(&qi(6)).expect("graded algebra");
    assert_eq!(singular.len(), 1, "the Ising model has a unique null vector");
    let null = &singular[0];
    println!("found: {}", v.fmt_element(null));

    // every strictly positive shifted mode of L annihilates it
    assert!(v.is_singular(null).expect("homogeneous"));
    let l = v.generator(0);
    for n in 1..=7 {
        let hit = v.shifted_product(&l, null, &qi(n)).expect("homogeneous");
        assert!(hit.is_zero(), "L_{n} should annihilate the null vector");
    }
    println!("verified: L_n kills it for all n in 1..=7");

    // and multiplying by L keeps it inside the ideal
    let deeper = v.mul(&l, null);
    println!(
        "L·(null vector) has weight {} and PBW degree {}",
        v.weight(&deeper).expect("homogeneous"),
        deeper.pbw_filtration_degree()
    );
}
