//! Symbolic linear and quadratic expressions over named decision variables.
//!
//! Terms are sparse: a coefficient list keyed by variable id, iterated in order
//! of first insertion so that generated solver models are reproducible across
//! runs. Quadratic terms store a lower-triangular matrix (row `i` holds columns
//! `0..=i`) over a union variable list plus a folded linear part.
//!
//! Degree greater than two is unrepresentable: [`LinTerm::times`] and
//! [`LinTerm::squared`] exist only on linear terms, so the type system rules
//! out the unsupported-model failure mode at compile time.

#[derive(Clone, Debug, PartialEq)]
/// A linear expression `Σ aᵢ·xᵢ + c`.
pub struct LinTerm {
    pub(crate) coeffs: Vec<(String, f64)>,
    pub(crate) constant: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// A quadratic expression `xᵀMx + linear`.
pub struct QuadTerm {
    pub(crate) var_ids: Vec<String>,
    // Lower-triangular: matrix[i].len() == i + 1.
    pub(crate) matrix: Vec<Vec<f64>>,
    pub(crate) lin: LinTerm,
}

#[derive(Clone, Debug, PartialEq)]
/// Either a linear or a quadratic expression.
pub enum Term {
    /// Degree at most one.
    Linear(LinTerm),
    /// Degree exactly two.
    Quadratic(QuadTerm),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Comparison kind of a normalized constraint.
pub enum Relation {
    /// `term <= 0`
    LessOrEqual,
    /// `term == 0`
    Equal,
}

#[derive(Clone, Debug, PartialEq)]
/// A constraint normalized to `term ⋈ 0` (the right-hand side already folded
/// into the term's constant).
pub struct Constraint {
    /// Comparison kind.
    pub relation: Relation,
    /// Left-hand side after subtracting the right-hand side.
    pub term: Term,
}

/// A constant expression.
pub fn constant(c: f64) -> LinTerm {
    LinTerm {
        coeffs: Vec::new(),
        constant: c,
    }
}

/// A single-variable expression with coefficient one.
pub fn variable(id: impl Into<String>) -> LinTerm {
    LinTerm {
        coeffs: vec![(id.into(), 1.0)],
        constant: 0.0,
    }
}

impl LinTerm {
    /// Variable ids and coefficients in first-insertion order.
    pub fn coeffs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.coeffs.iter().map(|(id, a)| (id.as_str(), *a))
    }

    /// The constant part `c`.
    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Add another linear term, merging coefficients of shared variables.
    pub fn add(&self, other: &LinTerm) -> LinTerm {
        let mut coeffs = self.coeffs.clone();
        for (id, b) in &other.coeffs {
            match coeffs.iter_mut().find(|(known, _)| known == id) {
                Some((_, a)) => *a += b,
                None => coeffs.push((id.clone(), *b)),
            }
        }
        LinTerm {
            coeffs,
            constant: self.constant + other.constant,
        }
    }

    /// Subtract another linear term.
    pub fn sub(&self, other: &LinTerm) -> LinTerm {
        self.add(&other.neg())
    }

    /// Negate all coefficients and the constant.
    pub fn neg(&self) -> LinTerm {
        self.scale(-1.0)
    }

    /// Multiply all coefficients and the constant by `k`.
    pub fn scale(&self, k: f64) -> LinTerm {
        LinTerm {
            coeffs: self.coeffs.iter().map(|(id, a)| (id.clone(), a * k)).collect(),
            constant: self.constant * k,
        }
    }

    /// Multiply by another linear term, producing a quadratic term.
    ///
    /// The variable lists are unioned; the matrix cell for each unordered pair
    /// accumulates `aᵢ·bⱼ + aⱼ·bᵢ` (just `aᵢ·bᵢ` on the diagonal). Terms mixing
    /// one operand's variables with the other's constant fold into the linear
    /// part.
    pub fn times(&self, other: &LinTerm) -> QuadTerm {
        let mut var_ids: Vec<String> = self.coeffs.iter().map(|(id, _)| id.clone()).collect();
        for (id, _) in &other.coeffs {
            if !var_ids.contains(id) {
                var_ids.push(id.clone());
            }
        }
        let mut matrix: Vec<Vec<f64>> = (0..var_ids.len()).map(|i| vec![0.0; i + 1]).collect();
        let index = |id: &str| var_ids.iter().position(|v| v == id).unwrap_or_default();
        for (va, a) in &self.coeffs {
            for (vb, b) in &other.coeffs {
                let (i, j) = (index(va), index(vb));
                let (row, col) = if i >= j { (i, j) } else { (j, i) };
                matrix[row][col] += a * b;
            }
        }
        let lin = LinTerm {
            coeffs: self.coeffs.clone(),
            constant: 0.0,
        }
        .scale(other.constant)
        .add(
            &LinTerm {
                coeffs: other.coeffs.clone(),
                constant: 0.0,
            }
            .scale(self.constant),
        )
        .add(&constant(self.constant * other.constant));
        QuadTerm {
            var_ids,
            matrix,
            lin,
        }
    }

    /// Square this linear term.
    pub fn squared(&self) -> QuadTerm {
        self.times(self)
    }

    /// Evaluate under a variable assignment (missing variables count as zero).
    pub fn eval(&self, values: &std::collections::BTreeMap<String, f64>) -> f64 {
        self.coeffs
            .iter()
            .map(|(id, a)| a * values.get(id).copied().unwrap_or_default())
            .sum::<f64>()
            + self.constant
    }
}

impl QuadTerm {
    /// Variable ids of the quadratic part, in first-insertion order.
    pub fn var_ids(&self) -> &[String] {
        &self.var_ids
    }

    /// The folded linear part.
    pub fn linear_part(&self) -> &LinTerm {
        &self.lin
    }

    /// Matrix cell for the unordered variable pair `(i, j)`.
    pub fn cell(&self, i: usize, j: usize) -> f64 {
        let (row, col) = if i >= j { (i, j) } else { (j, i) };
        self.matrix[row][col]
    }

    /// Negate the matrix and the linear part.
    pub fn neg(&self) -> QuadTerm {
        self.scale(-1.0)
    }

    /// Multiply the matrix and the linear part by `k`.
    pub fn scale(&self, k: f64) -> QuadTerm {
        QuadTerm {
            var_ids: self.var_ids.clone(),
            matrix: self
                .matrix
                .iter()
                .map(|row| row.iter().map(|x| x * k).collect())
                .collect(),
            lin: self.lin.scale(k),
        }
    }

    /// Add a linear term by folding it into the linear part.
    pub fn add_lin(&self, other: &LinTerm) -> QuadTerm {
        QuadTerm {
            var_ids: self.var_ids.clone(),
            matrix: self.matrix.clone(),
            lin: self.lin.add(other),
        }
    }

    /// Add another quadratic term, merging matrix cells only where both
    /// operands contribute.
    pub fn add(&self, other: &QuadTerm) -> QuadTerm {
        let mut var_ids = self.var_ids.clone();
        for id in &other.var_ids {
            if !var_ids.contains(id) {
                var_ids.push(id.clone());
            }
        }
        let mut matrix: Vec<Vec<f64>> = (0..var_ids.len()).map(|i| vec![0.0; i + 1]).collect();
        let mut accumulate = |q: &QuadTerm| {
            for (qi, qid) in q.var_ids.iter().enumerate() {
                for (qj, qjd) in q.var_ids.iter().enumerate().take(qi + 1) {
                    let cell = q.matrix[qi][qj];
                    if cell != 0.0 {
                        let i = var_ids.iter().position(|v| v == qid).unwrap_or_default();
                        let j = var_ids.iter().position(|v| v == qjd).unwrap_or_default();
                        let (row, col) = if i >= j { (i, j) } else { (j, i) };
                        matrix[row][col] += cell;
                    }
                }
            }
        };
        accumulate(self);
        accumulate(other);
        QuadTerm {
            var_ids,
            matrix,
            lin: self.lin.add(&other.lin),
        }
    }

    /// Evaluate under a variable assignment (missing variables count as zero).
    pub fn eval(&self, values: &std::collections::BTreeMap<String, f64>) -> f64 {
        let v = |id: &str| values.get(id).copied().unwrap_or_default();
        let mut acc = self.lin.eval(values);
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                acc += cell * v(&self.var_ids[i]) * v(&self.var_ids[j]);
            }
        }
        acc
    }
}

impl Term {
    /// Add two terms; linear + quadratic folds the linear part in.
    pub fn add(&self, other: &Term) -> Term {
        match (self, other) {
            (Term::Linear(a), Term::Linear(b)) => Term::Linear(a.add(b)),
            (Term::Linear(a), Term::Quadratic(b)) => Term::Quadratic(b.add_lin(a)),
            (Term::Quadratic(a), Term::Linear(b)) => Term::Quadratic(a.add_lin(b)),
            (Term::Quadratic(a), Term::Quadratic(b)) => Term::Quadratic(a.add(b)),
        }
    }

    /// Subtract a term.
    pub fn sub(&self, other: &Term) -> Term {
        self.add(&other.neg())
    }

    /// Negate a term.
    pub fn neg(&self) -> Term {
        match self {
            Term::Linear(a) => Term::Linear(a.neg()),
            Term::Quadratic(a) => Term::Quadratic(a.neg()),
        }
    }

    /// Scale a term by `k`.
    pub fn scale(&self, k: f64) -> Term {
        match self {
            Term::Linear(a) => Term::Linear(a.scale(k)),
            Term::Quadratic(a) => Term::Quadratic(a.scale(k)),
        }
    }

    /// Evaluate under a variable assignment.
    pub fn eval(&self, values: &std::collections::BTreeMap<String, f64>) -> f64 {
        match self {
            Term::Linear(a) => a.eval(values),
            Term::Quadratic(a) => a.eval(values),
        }
    }
}

impl From<LinTerm> for Term {
    fn from(value: LinTerm) -> Self {
        Term::Linear(value)
    }
}

impl From<QuadTerm> for Term {
    fn from(value: QuadTerm) -> Self {
        Term::Quadratic(value)
    }
}

/// Constraint `left <= right`, normalized to `left - right <= 0`.
pub fn less_or_equal(left: impl Into<Term>, right: impl Into<Term>) -> Constraint {
    Constraint {
        relation: Relation::LessOrEqual,
        term: left.into().sub(&right.into()),
    }
}

/// Constraint `left >= right`, normalized to `right - left <= 0`.
pub fn greater_or_equal(left: impl Into<Term>, right: impl Into<Term>) -> Constraint {
    less_or_equal(right, left)
}

/// Constraint `left == right`, normalized to `left - right == 0`.
pub fn equal(left: impl Into<Term>, right: impl Into<Term>) -> Constraint {
    Constraint {
        relation: Relation::Equal,
        term: left.into().sub(&right.into()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/algebra/term.rs"]
mod tests;
