//! Solver-facing optimization model and its textual LP encoding.
//!
//! The model is translated into CPLEX-style LP problem text: an objective
//! (quadratic part in `[ ... ] / 2` brackets), a constraint section, and a
//! bounds section listing *every* variable so that zero-coefficient variables
//! still appear in the solution. Variables keep first-occurrence order, which
//! makes the emitted text reproducible across runs.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::algebra::term::{Constraint, LinTerm, Relation, Term};
use crate::foundation::error::{PlotlineError, PlotlineResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Optimization direction.
pub enum Direction {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

#[derive(Clone, Debug)]
/// Objective function with direction.
pub struct Objective {
    /// Optimization direction.
    pub direction: Direction,
    /// Objective expression (linear or quadratic).
    pub term: Term,
}

#[derive(Clone, Debug, PartialEq)]
/// Explicit bounds for one variable. Unlisted variables default to `[0, ∞)`.
pub struct VarBounds {
    /// Variable name.
    pub id: String,
    /// Lower bound (`f64::NEG_INFINITY` for unbounded below).
    pub lb: f64,
    /// Upper bound (`f64::INFINITY` for unbounded above).
    pub ub: f64,
}

impl VarBounds {
    /// A variable bounded below only.
    pub fn at_least(id: impl Into<String>, lb: f64) -> Self {
        Self {
            id: id.into(),
            lb,
            ub: f64::INFINITY,
        }
    }

    /// A variable bounded on both sides.
    pub fn between(id: impl Into<String>, lb: f64, ub: f64) -> Self {
        Self {
            id: id.into(),
            lb,
            ub,
        }
    }

    /// An unbounded (free) variable.
    pub fn free(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lb: f64::NEG_INFINITY,
            ub: f64::INFINITY,
        }
    }
}

#[derive(Clone, Debug)]
/// A complete optimization model ready for a solver.
pub struct LpModel {
    /// Objective function.
    pub objective: Objective,
    /// Constraint list.
    pub constraints: Vec<Constraint>,
    /// Explicit variable bounds (others default to `[0, ∞)`).
    pub bounds: Vec<VarBounds>,
    /// Variables that must exist in the solution even with zero coefficients
    /// everywhere.
    pub extra_vars: Vec<String>,
}

impl LpModel {
    /// Minimization model over the given constraints.
    pub fn minimize(term: impl Into<Term>, constraints: Vec<Constraint>) -> Self {
        Self {
            objective: Objective {
                direction: Direction::Minimize,
                term: term.into(),
            },
            constraints,
            bounds: Vec::new(),
            extra_vars: Vec::new(),
        }
    }

    /// All variable names, in first-occurrence order over the objective, the
    /// constraints, the bounds and the explicit variable list.
    pub fn variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        let mut push = |id: &str| {
            if !vars.iter().any(|v| v == id) {
                vars.push(id.to_string());
            }
        };
        let mut push_term = |push: &mut dyn FnMut(&str), term: &Term| match term {
            Term::Linear(lin) => {
                for (id, _) in lin.coeffs() {
                    push(id);
                }
            }
            Term::Quadratic(quad) => {
                for id in quad.var_ids() {
                    push(id);
                }
                for (id, _) in quad.linear_part().coeffs() {
                    push(id);
                }
            }
        };
        push_term(&mut push, &self.objective.term);
        for c in &self.constraints {
            push_term(&mut push, &c.term);
        }
        for b in &self.bounds {
            push(&b.id);
        }
        for id in &self.extra_vars {
            push(id);
        }
        vars
    }

    /// Render the model as CPLEX-style LP problem text.
    ///
    /// Fails with [`PlotlineError::Model`] when a constraint carries a
    /// quadratic term (only the objective may be quadratic here).
    pub fn to_lp_text(&self) -> PlotlineResult<String> {
        let mut out = String::new();
        let header = match self.objective.direction {
            Direction::Minimize => "Minimize",
            Direction::Maximize => "Maximize",
        };
        out.push_str(header);
        out.push('\n');
        match &self.objective.term {
            Term::Linear(lin) => {
                let _ = writeln!(out, " obj: {}", fmt_linear(lin, true));
            }
            Term::Quadratic(quad) => {
                let mut quad_parts: Vec<String> = Vec::new();
                for (i, id_i) in quad.var_ids().iter().enumerate() {
                    for (j, id_j) in quad.var_ids().iter().enumerate().take(i + 1) {
                        let cell = quad.cell(i, j);
                        if cell == 0.0 {
                            continue;
                        }
                        // The bracketed section is divided by two in LP format.
                        let doubled = 2.0 * cell;
                        if i == j {
                            quad_parts.push(signed_part(doubled, &format!("{id_i} ^ 2")));
                        } else {
                            quad_parts.push(signed_part(doubled, &format!("{id_i} * {id_j}")));
                        }
                    }
                }
                let lin = fmt_linear(quad.linear_part(), true);
                if quad_parts.is_empty() {
                    let _ = writeln!(out, " obj: {lin}");
                } else if lin == "0" {
                    let _ = writeln!(out, " obj: [ {} ] / 2", join_signed(&quad_parts));
                } else {
                    let _ = writeln!(
                        out,
                        " obj: {lin} + [ {} ] / 2",
                        join_signed(&quad_parts)
                    );
                }
            }
        }
        out.push_str("Subject To\n");
        for (n, c) in self.constraints.iter().enumerate() {
            let lin = match &c.term {
                Term::Linear(lin) => lin,
                Term::Quadratic(_) => {
                    return Err(PlotlineError::model(format!(
                        "constraint c{n} is quadratic; only the objective may be quadratic"
                    )));
                }
            };
            if lin.coeffs().next().is_none() {
                return Err(PlotlineError::model(format!(
                    "constraint c{n} has no variables"
                )));
            }
            let rel = match c.relation {
                Relation::LessOrEqual => "<=",
                Relation::Equal => "=",
            };
            let rhs = -lin.constant_part();
            let _ = writeln!(
                out,
                " c{n}: {} {rel} {}",
                fmt_linear(lin, false),
                fmt_num(rhs)
            );
        }
        out.push_str("Bounds\n");
        let explicit: BTreeMap<&str, &VarBounds> =
            self.bounds.iter().map(|b| (b.id.as_str(), b)).collect();
        for id in self.variables() {
            match explicit.get(id.as_str()) {
                Some(b) if b.lb == f64::NEG_INFINITY && b.ub == f64::INFINITY => {
                    let _ = writeln!(out, " {id} free");
                }
                Some(b) if b.ub == f64::INFINITY => {
                    let _ = writeln!(out, " {} <= {id}", fmt_num(b.lb));
                }
                Some(b) => {
                    let _ = writeln!(out, " {} <= {id} <= {}", fmt_num(b.lb), fmt_num(b.ub));
                }
                // Default per the solver protocol, spelled out so the variable
                // exists in the solution even with zero coefficients.
                None => {
                    let _ = writeln!(out, " 0 <= {id}");
                }
            }
        }
        out.push_str("End\n");
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Terminal status reported by the solver.
pub enum SolveStatus {
    /// An optimal primal solution was found.
    Optimal,
    /// The model has no feasible point.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
}

#[derive(Clone, Debug)]
/// Parsed solver response.
pub struct Solution {
    /// Terminal status; values are meaningful only when `Optimal`.
    pub status: SolveStatus,
    /// Objective value at the reported solution, when available.
    pub objective: Option<f64>,
    /// Primal value per variable name.
    pub values: BTreeMap<String, f64>,
}

impl Solution {
    /// Primal value of `id`, requiring presence in the solution.
    pub fn value(&self, id: &str) -> PlotlineResult<f64> {
        self.values.get(id).copied().ok_or_else(|| {
            PlotlineError::solver(format!("solution is missing variable '{id}'"))
        })
    }
}

fn fmt_num(x: f64) -> String {
    if x == 0.0 {
        // Avoid "-0" for negated zero constants.
        return "0".to_string();
    }
    format!("{x}")
}

// One additive part with an embedded sign, e.g. "+ 2 x" / "- 0.5 y".
fn signed_part(coeff: f64, body: &str) -> String {
    if coeff < 0.0 {
        format!("- {} {body}", fmt_num(-coeff))
    } else {
        format!("+ {} {body}", fmt_num(coeff))
    }
}

fn join_signed(parts: &[String]) -> String {
    let joined = parts.join(" ");
    joined
        .strip_prefix("+ ")
        .map(str::to_string)
        .unwrap_or(joined)
}

fn fmt_linear(lin: &LinTerm, with_constant: bool) -> String {
    let mut parts: Vec<String> = lin
        .coeffs()
        .filter(|(_, a)| *a != 0.0)
        .map(|(id, a)| signed_part(a, id))
        .collect();
    if with_constant && lin.constant_part() != 0.0 {
        let c = lin.constant_part();
        if c < 0.0 {
            parts.push(format!("- {}", fmt_num(-c)));
        } else {
            parts.push(format!("+ {}", fmt_num(c)));
        }
    }
    if parts.is_empty() {
        return "0".to_string();
    }
    join_signed(&parts)
}

#[cfg(test)]
#[path = "../../tests/unit/solver/model.rs"]
mod tests;
