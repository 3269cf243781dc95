//! External LP/QP solver boundary.
//!
//! The engines only see the narrow [`Solver`] trait, so an alternative exact or
//! approximate solver can be substituted without touching alignment or
//! justification logic. The default implementation drives the system `highs`
//! binary through temp files, the same way the rendering pipeline of this
//! crate's lineage drives the system `ffmpeg` binary: probe PATH, spawn,
//! surface stderr on failure.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::foundation::error::{PlotlineError, PlotlineResult};
use crate::solver::model::{LpModel, Solution, SolveStatus};

/// Narrow seam to an external optimization solver.
pub trait Solver {
    /// Solve the model, returning the parsed terminal status and primal values.
    ///
    /// A non-`Optimal` status is a regular [`Solution`]; transport failures
    /// (spawn, IO, unparseable output) are errors.
    fn solve(&self, model: &LpModel) -> PlotlineResult<Solution>;
}

/// Whether the `highs` binary is available on PATH.
pub fn is_highs_on_path() -> bool {
    Command::new("highs")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[derive(Clone, Debug)]
/// [`Solver`] implementation shelling out to the HiGHS command line binary.
pub struct HighsSolver {
    binary: PathBuf,
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("highs"),
        }
    }
}

impl HighsSolver {
    /// Use a specific solver binary instead of `highs` from PATH.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Solver for HighsSolver {
    fn solve(&self, model: &LpModel) -> PlotlineResult<Solution> {
        let lp_text = model.to_lp_text()?;
        tracing::debug!(bytes = lp_text.len(), "submitting LP model");

        let dir = tempfile::tempdir()
            .map_err(|e| PlotlineError::solver(format!("failed to create temp dir: {e}")))?;
        let model_path = dir.path().join("model.lp");
        let solution_path = dir.path().join("model.sol");

        let mut file = std::fs::File::create(&model_path)
            .map_err(|e| PlotlineError::solver(format!("failed to write model file: {e}")))?;
        file.write_all(lp_text.as_bytes())
            .map_err(|e| PlotlineError::solver(format!("failed to write model file: {e}")))?;
        drop(file);

        let output = Command::new(&self.binary)
            .arg(&model_path)
            .arg("--solution_file")
            .arg(&solution_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                PlotlineError::solver(format!(
                    "failed to spawn solver '{}' (is it installed and on PATH?): {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlotlineError::solver(format!(
                "solver exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let raw = std::fs::read_to_string(&solution_path)
            .map_err(|e| PlotlineError::solver(format!("failed to read solution file: {e}")))?;
        let solution = parse_solution(&raw)?;
        tracing::debug!(status = ?solution.status, objective = ?solution.objective, "solver finished");
        Ok(solution)
    }
}

/// Parse a HiGHS raw-style solution file.
pub fn parse_solution(raw: &str) -> PlotlineResult<Solution> {
    let mut lines = raw.lines().map(str::trim);

    let mut status_text: Option<String> = None;
    for line in lines.by_ref() {
        if let Some(rest) = line.strip_prefix("Model status") {
            let rest = rest.trim_start_matches(':').trim();
            if rest.is_empty() {
                // Status is on the following non-empty line.
                status_text = lines.by_ref().find(|l| !l.is_empty()).map(str::to_string);
            } else {
                status_text = Some(rest.to_string());
            }
            break;
        }
    }
    let status_text =
        status_text.ok_or_else(|| PlotlineError::solver("solution has no model status"))?;
    let status = match status_text.as_str() {
        "Optimal" => SolveStatus::Optimal,
        "Infeasible" => SolveStatus::Infeasible,
        "Unbounded" => SolveStatus::Unbounded,
        other => {
            return Err(PlotlineError::solver(format!(
                "unexpected solver status '{other}'"
            )));
        }
    };

    let mut objective = None;
    let mut values = std::collections::BTreeMap::new();

    if status == SolveStatus::Optimal {
        let mut columns_left = 0usize;
        for line in lines {
            if let Some(rest) = line.strip_prefix("Objective") {
                objective = rest.trim().parse::<f64>().ok();
            } else if let Some(rest) = line.strip_prefix("# Columns") {
                columns_left = rest.trim().parse::<usize>().map_err(|e| {
                    PlotlineError::solver(format!("bad column count in solution: {e}"))
                })?;
            } else if columns_left > 0 && !line.is_empty() {
                let mut parts = line.split_whitespace();
                let (name, value) = (parts.next(), parts.next());
                if let (Some(name), Some(value)) = (name, value) {
                    let value = value.parse::<f64>().map_err(|e| {
                        PlotlineError::solver(format!("bad primal value for '{name}': {e}"))
                    })?;
                    values.insert(name.to_string(), value);
                }
                columns_left -= 1;
                if columns_left == 0 {
                    break;
                }
            }
        }
    }

    Ok(Solution {
        status,
        objective,
        values,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/solver/highs.rs"]
mod tests;
