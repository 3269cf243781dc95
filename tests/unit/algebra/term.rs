use super::*;
use std::collections::BTreeMap;

fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn add_merges_shared_coefficients() {
    let a = variable("x").scale(2.0).add(&variable("y")).add(&constant(1.0));
    let b = variable("y").scale(3.0).add(&variable("z")).add(&constant(-0.5));
    let sum = a.add(&b);
    let collected: Vec<(&str, f64)> = sum.coeffs().collect();
    assert_eq!(collected, vec![("x", 2.0), ("y", 4.0), ("z", 1.0)]);
    assert_eq!(sum.constant_part(), 0.5);
}

#[test]
fn coefficients_keep_first_insertion_order() {
    let a = variable("b").add(&variable("a"));
    let b = variable("c").add(&variable("a"));
    let sum = a.add(&b);
    let ids: Vec<&str> = sum.coeffs().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn square_fills_lower_triangle() {
    // (2x + 3y + 1)² = 4x² + 12xy + 9y² + 4x + 6y + 1
    let t = variable("x").scale(2.0).add(&variable("y").scale(3.0)).add(&constant(1.0));
    let sq = t.squared();
    assert_eq!(sq.var_ids(), &["x".to_string(), "y".to_string()]);
    assert_eq!(sq.cell(0, 0), 4.0);
    assert_eq!(sq.cell(1, 1), 9.0);
    assert_eq!(sq.cell(1, 0), 12.0);
    assert_eq!(sq.cell(0, 1), 12.0); // unordered pair
    let lin: Vec<(&str, f64)> = sq.linear_part().coeffs().collect();
    assert_eq!(lin, vec![("x", 4.0), ("y", 6.0)]);
    assert_eq!(sq.linear_part().constant_part(), 1.0);
}

#[test]
fn times_unions_distinct_variable_lists() {
    // (x + 2)(y - 1) = xy - x + 2y - 2
    let product = variable("x").add(&constant(2.0)).times(&variable("y").sub(&constant(1.0)));
    assert_eq!(product.var_ids(), &["x".to_string(), "y".to_string()]);
    assert_eq!(product.cell(0, 0), 0.0);
    assert_eq!(product.cell(1, 0), 1.0);
    assert_eq!(product.cell(1, 1), 0.0);
    let lin: Vec<(&str, f64)> = product.linear_part().coeffs().collect();
    assert_eq!(lin, vec![("x", -1.0), ("y", 2.0)]);
    assert_eq!(product.linear_part().constant_part(), -2.0);
}

#[test]
fn quadratic_sum_merges_only_shared_cells() {
    let a = variable("x").add(&variable("y")).squared(); // x² + 2xy + y²
    let b = variable("y").add(&variable("z")).squared(); // y² + 2yz + z²
    let sum = a.add(&b);
    assert_eq!(sum.var_ids(), &["x".to_string(), "y".to_string(), "z".to_string()]);
    assert_eq!(sum.cell(0, 0), 1.0); // x² from a only
    assert_eq!(sum.cell(1, 1), 2.0); // y² from both
    assert_eq!(sum.cell(2, 2), 1.0); // z² from b only
    assert_eq!(sum.cell(1, 0), 2.0); // xy from a only
    assert_eq!(sum.cell(2, 1), 2.0); // yz from b only
    assert_eq!(sum.cell(2, 0), 0.0); // xz from neither
}

#[test]
fn evaluation_matches_symbolic_construction() {
    let vals = values(&[("x", 2.0), ("y", -1.0)]);
    let delta = variable("x").sub(&variable("y")).add(&constant(0.5)); // 3.5
    assert_eq!(delta.eval(&vals), 3.5);
    assert_eq!(delta.squared().eval(&vals), 3.5 * 3.5);

    let mixed = Term::from(delta.squared()).add(&Term::from(variable("y")));
    assert_eq!(mixed.eval(&vals), 3.5 * 3.5 - 1.0);
}

#[test]
fn constraints_normalize_to_zero_rhs() {
    let c = less_or_equal(variable("x"), variable("y").add(&constant(3.0)));
    assert_eq!(c.relation, Relation::LessOrEqual);
    let Term::Linear(lin) = &c.term else {
        panic!("expected linear constraint");
    };
    let coeffs: Vec<(&str, f64)> = lin.coeffs().collect();
    assert_eq!(coeffs, vec![("x", 1.0), ("y", -1.0)]);
    assert_eq!(lin.constant_part(), -3.0);

    let g = greater_or_equal(variable("x"), constant(2.0));
    let Term::Linear(lin) = &g.term else {
        panic!("expected linear constraint");
    };
    // Normalized to 2 - x <= 0.
    assert_eq!(g.relation, Relation::LessOrEqual);
    assert_eq!(lin.coeffs().collect::<Vec<_>>(), vec![("x", -1.0)]);
    assert_eq!(lin.constant_part(), 2.0);

    let e = equal(variable("x"), variable("x"));
    assert_eq!(e.relation, Relation::Equal);
}

#[test]
fn negation_flips_everything() {
    let t = variable("x").scale(2.0).add(&constant(-1.0));
    let n = t.neg();
    assert_eq!(n.coeffs().collect::<Vec<_>>(), vec![("x", -2.0)]);
    assert_eq!(n.constant_part(), 1.0);

    let q = t.squared().neg();
    assert_eq!(q.cell(0, 0), -4.0);
}
