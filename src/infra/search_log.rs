// ============================================================
// Layer 6 — Search Log
// ============================================================
// Appends one CSV row per scored candidate of the halving search:
//
//   iteration,n_resources,candidate,mean_score,params
//   0,10,0,-0.812345,"hidden=[32] activation=Relu ..."
//   0,10,1,-0.790112,"hidden=[32] activation=Relu ..."
//   1,20,1,-0.701554,"..."
//
// mean_score is the mean negative MAE across folds (higher is
// better). The file is shared across runs; the header is only
// written when the file is created.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::ml::search::CandidateScore;

const HEADER: &str = "iteration,n_resources,candidate,mean_score,params";

pub struct SearchLogger {
    csv_path: PathBuf,
}

impl SearchLogger {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create log directory '{}'", dir.display()))?;

        let csv_path = dir.join("search_log.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created search log '{}'", csv_path.display());
        }
        Ok(Self { csv_path })
    }

    pub fn log(&self, score: &CandidateScore) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{:.6},\"{}\"",
            score.iteration,
            score.n_resources,
            score.candidate,
            score.mean_score,
            score.params.to_string().replace('"', "'"),
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::{Activation, HyperParams, Solver};

    fn score(iteration: usize, candidate: usize) -> CandidateScore {
        CandidateScore {
            iteration,
            n_resources: 10 * (iteration + 1),
            candidate,
            params: HyperParams {
                hidden_layer_sizes: vec![64, 32],
                activation:         Activation::Relu,
                alpha:              1e-4,
                learning_rate_init: 1e-3,
                solver:             Solver::Adam,
                max_epochs:         100,
            },
            mean_score: -0.75,
        }
    }

    #[test]
    fn test_rows_are_appended_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = SearchLogger::new(dir.path()).unwrap();
        logger.log(&score(0, 3)).unwrap();

        // a second logger on the same directory keeps the existing rows
        let again = SearchLogger::new(dir.path()).unwrap();
        again.log(&score(1, 3)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("0,10,3,-0.750000,\"hidden=[64, 32]"));
        assert!(lines[2].starts_with("1,20,3,"));
    }
}
