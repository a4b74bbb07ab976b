//! Invocation of an external SAT solver on an encoded puzzle
//!
//! The solver is any command that reads a DIMACS file and prints its verdict
//! plus `label value` (or `label: value`) statistics lines, such as zChaff or
//! MiniSat. Statistics are looked up by label, never by position.

use super::VariableMap;
use crate::config::SolverConfig;
use crate::error::{PuzzleError, SolverError};
use crate::sudoku::PuzzleGrid;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Placeholder in configured arguments replaced by the formula path
pub const CNF_PLACEHOLDER: &str = "{cnf}";

/// Verdict reported by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverOutcome {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

/// Parsed solver output
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub outcome: SolverOutcome,
    /// Every numeric statistic found, keyed by its label
    pub values: BTreeMap<String, f64>,
    /// Model literals from `v` lines, when the solver prints them
    pub model: Option<Vec<i32>>,
    /// Exit code of the solver process, `None` when killed by a signal or parsed offline
    pub exit_code: Option<i32>,
    pub wall_time: Duration,
}

impl SolverStatistics {
    /// Look up a statistic by label, ignoring case and surrounding punctuation
    pub fn get(&self, label: &str) -> Result<f64, SolverError> {
        self.values
            .get(&normalize_label(label))
            .copied()
            .ok_or_else(|| SolverError::MissingStatistic(label.to_string()))
    }

    /// Fail when any of `labels` is absent
    pub fn require(&self, labels: &[String]) -> Result<(), SolverError> {
        for label in labels {
            self.get(label)?;
        }
        Ok(())
    }

    /// Decode the model into the solved grid
    pub fn solved_grid(&self, size: usize) -> Result<PuzzleGrid, SolverError> {
        let model = self.model.as_ref().ok_or(SolverError::MissingModel)?;
        Ok(decode_model(model, size)?)
    }
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Result: {:?}", self.outcome)?;
        writeln!(f, "  Wall time: {:.3}s", self.wall_time.as_secs_f64())?;
        if let Some(code) = self.exit_code {
            writeln!(f, "  Exit code: {}", code)?;
        }
        for (label, value) in &self.values {
            writeln!(f, "  {}: {}", label, value)?;
        }
        Ok(())
    }
}

/// Runs a solver on a DIMACS file
pub trait SolverRunner {
    fn run(&self, cnf_path: &Path) -> Result<SolverStatistics, SolverError>;
}

/// Solver launched as a child process
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    command: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    required_statistics: Vec<String>,
}

impl ExternalSolver {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: vec![CNF_PLACEHOLDER.to_string()],
            timeout: None,
            required_statistics: Vec::new(),
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: (config.timeout_seconds > 0)
                .then(|| Duration::from_secs(config.timeout_seconds)),
            required_statistics: config.required_statistics.clone(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_required_statistics(mut self, labels: Vec<String>) -> Self {
        self.required_statistics = labels;
        self
    }

    fn build_args(&self, cnf_path: &Path) -> Vec<String> {
        let path = cnf_path.display().to_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(CNF_PLACEHOLDER, &path))
            .collect();
        if !self.args.iter().any(|arg| arg.contains(CNF_PLACEHOLDER)) {
            args.push(path);
        }
        args
    }
}

impl SolverRunner for ExternalSolver {
    fn run(&self, cnf_path: &Path) -> Result<SolverStatistics, SolverError> {
        let args = self.build_args(cnf_path);
        debug!("Running {} {}", self.command, args.join(" "));

        let start = Instant::now();
        let mut child = Command::new(&self.command)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SolverError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Drain stdout on a separate thread so a chatty solver cannot block on a full pipe
        let mut stdout = child.stdout.take().ok_or_else(|| {
            SolverError::Io(std::io::Error::other("solver stdout was not captured"))
        })?;
        let reader = std::thread::spawn(move || {
            let mut output = String::new();
            stdout.read_to_string(&mut output).map(|_| output)
        });

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if let Some(timeout) = self.timeout {
                if start.elapsed() > timeout {
                    if let Err(e) = child.kill() {
                        warn!("Failed to kill timed out solver: {}", e);
                    }
                    let _ = child.wait();
                    return Err(SolverError::Timeout(timeout));
                }
            }
            std::thread::sleep(Duration::from_millis(10));
        };

        let output = reader
            .join()
            .map_err(|_| SolverError::Io(std::io::Error::other("solver output reader panicked")))??;

        let mut statistics = match parse_output(&output) {
            Err(SolverError::MissingVerdict) if !is_conventional_exit(status) => {
                return Err(SolverError::AbnormalExit(status));
            }
            parsed => parsed?,
        };
        statistics.exit_code = status.code();
        statistics.wall_time = start.elapsed();
        statistics.require(&self.required_statistics)?;

        Ok(statistics)
    }
}

/// Exit codes of a solver that finished normally: 10 SAT, 20 UNSAT, 0 for solvers that
/// report only in their output
fn is_conventional_exit(status: ExitStatus) -> bool {
    matches!(status.code(), Some(0 | 10 | 20))
}

/// Lower-case a label and collapse internal whitespace
fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '=')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split a statistics line into its label and the first number after it
fn parse_statistic_line(line: &str) -> Option<(String, f64)> {
    let line = line.trim();
    let line = line
        .strip_prefix("c ")
        .unwrap_or(line)
        .trim_matches(|c: char| c == '|' || c.is_whitespace());
    if line.is_empty() {
        return None;
    }

    // `label : value ...` first, then `label<whitespace>value`
    let numeric = |text: &str| {
        text.trim_start()
            .starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
    };
    let (label, rest) = match line.split_once(':') {
        Some((label, rest)) if !label.trim().is_empty() && numeric(rest) => (label, rest),
        _ => {
            let split = line.find(|c: char| c.is_ascii_digit())?;
            if split == 0 {
                return None;
            }
            line.split_at(split)
        }
    };

    let label = normalize_label(label);
    if label.is_empty() || !label.chars().any(char::is_alphabetic) {
        return None;
    }
    let value = rest.split_whitespace().next()?.parse::<f64>().ok()?;
    Some((label, value))
}

fn parse_outcome(line: &str) -> Option<SolverOutcome> {
    let upper = line.trim().to_uppercase();
    let verdict = upper
        .strip_prefix("S ")
        .or_else(|| upper.strip_prefix("RESULT:"))
        .unwrap_or(upper.as_str())
        .trim();

    match verdict {
        "SAT" | "SATISFIABLE" => Some(SolverOutcome::Satisfiable),
        "UNSAT" | "UNSATISFIABLE" => Some(SolverOutcome::Unsatisfiable),
        "UNKNOWN" | "INDETERMINATE" => Some(SolverOutcome::Unknown),
        _ => None,
    }
}

/// Parse a solver's free-text output. Output without a result line is an error.
pub fn parse_output(output: &str) -> Result<SolverStatistics, SolverError> {
    let mut outcome = None;
    let mut values = BTreeMap::new();
    let mut model: Option<Vec<i32>> = None;

    for line in output.lines() {
        if let Some(verdict) = parse_outcome(line) {
            outcome = Some(verdict);
            continue;
        }

        if let Some(literals) = line.trim().strip_prefix("v ") {
            let entries = model.get_or_insert_with(Vec::new);
            for token in literals.split_whitespace() {
                let literal: i32 = token
                    .parse()
                    .map_err(|_| SolverError::MalformedModel(token.to_string()))?;
                if literal != 0 {
                    entries.push(literal);
                }
            }
            continue;
        }

        if let Some((label, value)) = parse_statistic_line(line) {
            values.entry(label).or_insert(value);
        }
    }

    Ok(SolverStatistics {
        outcome: outcome.ok_or(SolverError::MissingVerdict)?,
        values,
        model,
        exit_code: None,
        wall_time: Duration::ZERO,
    })
}

/// Rebuild a grid from a model: each true variable `(r, c, v)` sets cell `(r, c)` to `v + 1`
pub fn decode_model(model: &[i32], size: usize) -> Result<PuzzleGrid, PuzzleError> {
    let vm = VariableMap::new(size)?;
    let mut grid = PuzzleGrid::empty(size)?;

    for &literal in model.iter().filter(|&&lit| lit > 0) {
        if let Some((r, c, v)) = vm.decode(literal) {
            grid.set(r, c, (v + 1) as u8)?;
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZCHAFF_OUTPUT: &str = "Z-Chaff Version: Chaff II
Solving encoding.cnf ......
CONFLICT during preprocess
Instance Unsatisfiable
Random Seed Used\t\t\t\t0
Max Decision Level\t\t\t\t0
Num. of Decisions\t\t\t\t0
( Stack + Vsids + Shrinking Decisions )\t0 + 0 + 0
Original Num Variables\t\t\t\t729
Original Num Clauses\t\t\t\t8830
Added Conflict Clauses\t\t\t\t0
Number of Implication\t\t\t\t729
Total Run Time\t\t\t\t\t0.001
RESULT:\tUNSAT
";

    const MINISAT_OUTPUT: &str = "c restarts              : 1
c conflicts             : 12             (1200 /sec)
c decisions             : 40             (0.00 % random) (4000 /sec)
c propagations          : 2160           (216000 /sec)
s SATISFIABLE
v 1 -2 -3 -4 5 0
";

    #[test]
    fn test_parse_zchaff_labels() {
        let stats = parse_output(ZCHAFF_OUTPUT).unwrap();
        assert_eq!(stats.outcome, SolverOutcome::Unsatisfiable);
        assert_eq!(stats.get("Max Decision Level").unwrap(), 0.0);
        assert_eq!(stats.get("Original Num Clauses").unwrap(), 8830.0);
        assert_eq!(stats.get("number of implication").unwrap(), 729.0);
        assert!((stats.get("Total Run Time").unwrap() - 0.001).abs() < 1e-12);
        assert!(stats.model.is_none());
    }

    #[test]
    fn test_parse_minisat_labels() {
        let stats = parse_output(MINISAT_OUTPUT).unwrap();
        assert_eq!(stats.outcome, SolverOutcome::Satisfiable);
        assert_eq!(stats.get("conflicts").unwrap(), 12.0);
        assert_eq!(stats.get("decisions").unwrap(), 40.0);
        assert_eq!(stats.model, Some(vec![1, -2, -3, -4, 5]));
    }

    #[test]
    fn test_missing_statistic_is_an_error() {
        let stats = parse_output(MINISAT_OUTPUT).unwrap();
        let err = stats.require(&["conflict literals".to_string()]).unwrap_err();
        assert!(matches!(err, SolverError::MissingStatistic(label) if label == "conflict literals"));
    }

    #[test]
    fn test_malformed_model() {
        let err = parse_output("s SATISFIABLE\nv 1 x 0\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedModel(_)));
    }

    #[test]
    fn test_decode_model() {
        let vm = VariableMap::new(4).unwrap();
        let model = vec![vm.var(0, 0, 3), -vm.var(0, 1, 0), vm.var(3, 2, 1)];
        let grid = decode_model(&model, 4).unwrap();
        assert_eq!(grid.get(0, 0), 4);
        assert_eq!(grid.get(0, 1), 0);
        assert_eq!(grid.get(3, 2), 2);
    }

    #[test]
    fn test_build_args() {
        let solver = ExternalSolver::new("zchaff");
        assert_eq!(solver.build_args(Path::new("a.cnf")), vec!["a.cnf"]);

        let solver = ExternalSolver::new("minisat").with_args(vec!["-verb=1".to_string()]);
        assert_eq!(solver.build_args(Path::new("a.cnf")), vec!["-verb=1", "a.cnf"]);
    }

    #[test]
    fn test_missing_verdict() {
        assert!(matches!(
            parse_output("Segmentation fault\n"),
            Err(SolverError::MissingVerdict)
        ));
        assert!(matches!(parse_output(""), Err(SolverError::MissingVerdict)));

        let stats = parse_output("s UNKNOWN\nc conflicts : 3\n").unwrap();
        assert_eq!(stats.outcome, SolverOutcome::Unknown);
    }

    #[test]
    #[cfg(unix)]
    fn test_abnormal_exit_without_verdict() {
        let solver = ExternalSolver::new("false").with_args(vec![]);
        let err = solver.run(Path::new("missing.cnf")).unwrap_err();
        assert!(matches!(err, SolverError::AbnormalExit(status) if status.code() == Some(1)));
    }

    #[test]
    #[cfg(unix)]
    fn test_silent_clean_exit_is_missing_verdict() {
        let solver = ExternalSolver::new("true").with_args(vec![]);
        let err = solver.run(Path::new("missing.cnf")).unwrap_err();
        assert!(matches!(err, SolverError::MissingVerdict));
    }

    #[test]
    #[cfg(unix)]
    fn test_competition_exit_code_recorded() {
        let solver = ExternalSolver::new("sh").with_args(vec![
            "-c".to_string(),
            "echo 's UNSATISFIABLE'; echo 'c conflicts : 7'; exit 20".to_string(),
        ]);
        let stats = solver.run(Path::new("a.cnf")).unwrap();
        assert_eq!(stats.outcome, SolverOutcome::Unsatisfiable);
        assert_eq!(stats.exit_code, Some(20));
        assert_eq!(stats.get("conflicts").unwrap(), 7.0);
    }

    #[test]
    #[cfg(unix)]
    fn test_timeout_kills_solver() {
        let solver = ExternalSolver::new("sh")
            .with_args(vec!["-c".to_string(), "sleep 5".to_string()])
            .with_timeout(Duration::from_millis(100));
        let start = Instant::now();
        let err = solver.run(Path::new("a.cnf")).unwrap_err();
        assert!(matches!(err, SolverError::Timeout(t) if t == Duration::from_millis(100)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_binary() {
        let solver = ExternalSolver::new("definitely-not-a-sat-solver-binary");
        let err = solver.run(Path::new("missing.cnf")).unwrap_err();
        assert!(matches!(err, SolverError::Spawn { .. }));
    }
}
