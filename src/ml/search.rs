// ============================================================
// Layer 5 — Successive-Halving Grid Search
// ============================================================
// Every grid point starts as a candidate. Each round scores the
// surviving candidates with K-fold cross-validation on a seeded
// subsample of the training rows, keeps the best ceil(n / factor)
// and multiplies the row budget by `factor` for the next round.
//
// Budget schedule (resource = number of training rows):
//
//   required rounds  = 1 + ⌊log_f(candidates)⌋
//   smallest budget  = 2 · folds
//   min_resources    = max(smallest, rows / f^(required − 1))
//   possible rounds  = 1 + ⌊log_f(rows / min_resources)⌋
//   rounds           = min(required, possible)
//   budget(round i)  = min(rows, min_resources · f^i)
//
// Score = mean over folds of −MAE in hours (higher is better).
// The best candidate of the last round wins. Any failing fit
// aborts the whole search.

use serde::{Deserialize, Serialize};

use crate::data::dataset::SurveyDataset;
use crate::data::splitter::{kfold_indices, subsample_indices};
use crate::domain::traits::SleepPredictor;
use crate::error::{PipelineError, Result};
use crate::ml::evaluation::mean_absolute_error;
use crate::ml::model::{Activation, HyperParams, Solver};
use crate::ml::pipeline::SleepPipeline;
use crate::ml::trainer::FitSettings;

/// Discrete values to search for each hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub hidden_layer_sizes: Vec<Vec<usize>>,
    pub activation:         Vec<Activation>,
    pub alpha:              Vec<f64>,
    pub learning_rate_init: Vec<f64>,
    pub solver:             Vec<Solver>,
    pub max_epochs:         Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            hidden_layer_sizes: vec![vec![32], vec![64], vec![64, 32]],
            activation:         vec![Activation::Relu, Activation::Tanh],
            alpha:              vec![1e-4, 1e-3],
            learning_rate_init: vec![1e-3, 5e-4],
            solver:             vec![Solver::Adam, Solver::Sgd],
            max_epochs:         vec![100, 300],
        }
    }
}

impl ParamGrid {
    /// Every combination, hidden sizes varying slowest.
    pub fn candidates(&self) -> Result<Vec<HyperParams>> {
        let axes = [
            ("hidden_layer_sizes", self.hidden_layer_sizes.len()),
            ("activation", self.activation.len()),
            ("alpha", self.alpha.len()),
            ("learning_rate_init", self.learning_rate_init.len()),
            ("solver", self.solver.len()),
            ("max_epochs", self.max_epochs.len()),
        ];
        if let Some((name, _)) = axes.iter().find(|(_, len)| *len == 0) {
            return Err(PipelineError::InvalidGrid(format!("'{name}' has no values")));
        }
        if self.hidden_layer_sizes.iter().flatten().any(|&w| w == 0) {
            return Err(PipelineError::InvalidGrid("hidden layer width must be positive".to_string()));
        }
        if self.max_epochs.contains(&0) {
            return Err(PipelineError::InvalidGrid("max_epochs must be positive".to_string()));
        }
        if self.learning_rate_init.iter().chain(&self.alpha).any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PipelineError::InvalidGrid(
                "alpha and learning_rate_init must be finite and non-negative".to_string(),
            ));
        }

        let mut out = Vec::new();
        for hidden in &self.hidden_layer_sizes {
            for &activation in &self.activation {
                for &alpha in &self.alpha {
                    for &learning_rate_init in &self.learning_rate_init {
                        for &solver in &self.solver {
                            for &max_epochs in &self.max_epochs {
                                out.push(HyperParams {
                                    hidden_layer_sizes: hidden.clone(),
                                    activation,
                                    alpha,
                                    learning_rate_init,
                                    solver,
                                    max_epochs,
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub cv_folds: usize,
    pub factor:   usize,
    pub seed:     u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { cv_folds: 5, factor: 2, seed: 42 }
    }
}

/// Row budget per round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub min_resources: usize,
    pub budgets:       Vec<usize>,
}

impl Schedule {
    pub fn plan(n_candidates: usize, max_resources: usize, settings: &SearchSettings) -> Result<Self> {
        let factor = settings.factor;
        if factor < 2 {
            return Err(PipelineError::InvalidGrid("halving factor must be at least 2".to_string()));
        }
        if settings.cv_folds < 2 {
            return Err(PipelineError::InvalidGrid("cross-validation needs at least 2 folds".to_string()));
        }

        let smallest = 2 * settings.cv_folds;
        let required = 1 + ilog(n_candidates.max(1), factor);
        let exhaust  = max_resources / factor.pow(required as u32 - 1);
        let min_resources = smallest.max(exhaust);

        if min_resources > max_resources {
            return Err(PipelineError::InsufficientData(format!(
                "the search needs at least {min_resources} training rows for {} folds, got {max_resources}",
                settings.cv_folds
            )));
        }

        let possible = 1 + ilog(max_resources / min_resources, factor);
        let rounds   = required.min(possible);
        let budgets  = (0..rounds)
            .map(|i| (min_resources * factor.pow(i as u32)).min(max_resources))
            .collect();

        Ok(Self { min_resources, budgets })
    }
}

/// ⌊log_base(x)⌋ for x ≥ 1.
fn ilog(mut x: usize, base: usize) -> usize {
    let mut n = 0;
    while x >= base {
        x /= base;
        n += 1;
    }
    n
}

/// One candidate's score in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub iteration:   usize,
    pub n_resources: usize,
    pub candidate:   usize,
    pub params:      HyperParams,
    pub mean_score:  f64,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_params: HyperParams,
    pub best_score:  f64,
    pub schedule:    Schedule,
    pub history:     Vec<CandidateScore>,
}

pub struct HalvingGridSearch {
    grid:     ParamGrid,
    settings: SearchSettings,
    fit:      FitSettings,
}

impl HalvingGridSearch {
    pub fn new(grid: ParamGrid, settings: SearchSettings, fit: FitSettings) -> Self {
        Self { grid, settings, fit }
    }

    /// Run the search; `on_score` sees every candidate score as it is produced.
    pub fn run<F, E>(&self, data: &SurveyDataset, mut on_score: F) -> std::result::Result<SearchOutcome, E>
    where
        F: FnMut(&CandidateScore) -> std::result::Result<(), E>,
        E: From<PipelineError>,
    {
        let candidates = self.grid.candidates()?;
        let schedule   = Schedule::plan(candidates.len(), data.len(), &self.settings)?;
        tracing::info!(
            "Halving search: {} candidates, {} rounds from {} rows, budgets {:?}",
            candidates.len(),
            schedule.budgets.len(),
            schedule.min_resources,
            schedule.budgets
        );

        let mut alive: Vec<usize> = (0..candidates.len()).collect();
        let mut history = Vec::new();
        let mut last_round: Vec<(usize, f64)> = Vec::new();

        for (iteration, &n_resources) in schedule.budgets.iter().enumerate() {
            let rows = subsample_indices(data.len(), n_resources, self.settings.seed.wrapping_add(iteration as u64));
            let sample = data.subset(&rows);

            let mut scored: Vec<(usize, f64)> = Vec::with_capacity(alive.len());
            for &candidate in &alive {
                let params = &candidates[candidate];
                let mean_score = self.cross_validate(params, &sample)?;
                let score = CandidateScore {
                    iteration,
                    n_resources,
                    candidate,
                    params: params.clone(),
                    mean_score,
                };
                tracing::debug!("round {iteration} candidate {candidate}: {mean_score:.4} ({params})");
                on_score(&score)?;
                history.push(score);
                scored.push((candidate, mean_score));
            }

            // Best first; ties keep grid order.
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            tracing::info!(
                "Round {}: {} candidates on {} rows, best score {:.4}",
                iteration,
                scored.len(),
                n_resources,
                scored.first().map_or(f64::NAN, |s| s.1)
            );

            let keep = scored.len().div_ceil(self.settings.factor);
            alive = scored.iter().take(keep).map(|(c, _)| *c).collect();
            last_round = scored;
        }

        let (best, best_score) = last_round
            .first()
            .copied()
            .ok_or_else(|| PipelineError::InvalidGrid("search produced no scores".to_string()))?;

        Ok(SearchOutcome {
            best_params: candidates[best].clone(),
            best_score,
            schedule,
            history,
        })
    }

    /// Mean −MAE over the folds.
    fn cross_validate(&self, params: &HyperParams, sample: &SurveyDataset) -> Result<f64> {
        let folds = kfold_indices(sample.len(), self.settings.cv_folds);
        let mut total = 0.0;
        for (train_idx, valid_idx) in &folds {
            let train = sample.subset(train_idx);
            let valid = sample.subset(valid_idx);

            let (pipeline, _) = SleepPipeline::fit(params, train.records(), train.targets(), &self.fit)
                .map_err(|e| candidate_failure(params, e))?;
            let preds = pipeline
                .predict(valid.records())
                .map_err(|e| candidate_failure(params, e))?;
            total -= mean_absolute_error(&preds, valid.targets());
        }
        Ok(total / folds.len() as f64)
    }
}

fn candidate_failure(params: &HyperParams, err: PipelineError) -> PipelineError {
    match err {
        failed @ PipelineError::CandidateFailed { .. } => failed,
        other => PipelineError::CandidateFailed {
            params: params.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic;

    fn tiny_grid() -> ParamGrid {
        ParamGrid {
            hidden_layer_sizes: vec![vec![4], vec![8]],
            activation:         vec![Activation::Relu, Activation::Tanh],
            alpha:              vec![1e-4],
            learning_rate_init: vec![1e-2],
            solver:             vec![Solver::Adam],
            max_epochs:         vec![10],
        }
    }

    #[test]
    fn test_default_grid_size() {
        assert_eq!(ParamGrid::default().candidates().unwrap().len(), 96);
    }

    #[test]
    fn test_empty_axis_is_rejected() {
        let grid = ParamGrid { solver: vec![], ..ParamGrid::default() };
        assert!(matches!(grid.candidates(), Err(PipelineError::InvalidGrid(_))));
    }

    #[test]
    fn test_schedule_exhausts_resources() {
        // 96 candidates, factor 2: 7 rounds required
        let s = Schedule::plan(96, 200, &SearchSettings::default()).unwrap();
        assert_eq!(s.min_resources, 10);
        assert_eq!(s.budgets, vec![10, 20, 40, 80, 160]);

        let s = Schedule::plan(4, 200, &SearchSettings::default()).unwrap();
        assert_eq!(s.min_resources, 50);
        assert_eq!(s.budgets, vec![50, 100, 200]);
    }

    #[test]
    fn test_schedule_needs_two_rows_per_fold() {
        assert!(matches!(
            Schedule::plan(4, 9, &SearchSettings::default()),
            Err(PipelineError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_ilog() {
        assert_eq!(ilog(1, 2), 0);
        assert_eq!(ilog(96, 2), 6);
        assert_eq!(ilog(8, 2), 3);
    }

    #[test]
    fn test_search_halves_candidates_each_round() {
        let data = SurveyDataset::new(synthetic::survey(60, 3, true));
        let search = HalvingGridSearch::new(
            tiny_grid(),
            SearchSettings { cv_folds: 3, ..SearchSettings::default() },
            FitSettings::default(),
        );

        let mut seen = Vec::new();
        let outcome = search
            .run(&data, |s| {
                seen.push((s.iteration, s.candidate));
                Ok::<_, PipelineError>(())
            })
            .unwrap();

        // 4 candidates → rounds of 4, 2, 1
        assert_eq!(outcome.schedule.budgets, vec![15, 30, 60]);
        let per_round = |i| seen.iter().filter(|(it, _)| *it == i).count();
        assert_eq!((per_round(0), per_round(1), per_round(2)), (4, 2, 1));
        assert!(outcome.best_score <= 0.0);
        assert_eq!(outcome.history.len(), 7);
    }

    #[test]
    fn test_failing_fit_aborts_search() {
        // 3 folds over 6 rows leaves 4 training rows; a 0.9 holdout takes all of them
        let data = SurveyDataset::new(synthetic::survey(6, 3, true));
        let search = HalvingGridSearch::new(
            tiny_grid(),
            SearchSettings { cv_folds: 3, ..SearchSettings::default() },
            FitSettings { validation_fraction: 0.9, ..FitSettings::default() },
        );
        assert!(matches!(
            search.run(&data, |_| Ok::<_, PipelineError>(())),
            Err(PipelineError::CandidateFailed { .. })
        ));
    }

    #[test]
    fn test_callback_error_stops_search() {
        let data = SurveyDataset::new(synthetic::survey(30, 3, true));
        let search = HalvingGridSearch::new(
            tiny_grid(),
            SearchSettings { cv_folds: 3, ..SearchSettings::default() },
            FitSettings::default(),
        );
        let result = search.run(&data, |_| Err(PipelineError::Tensor("log closed".to_string())));
        assert!(matches!(result, Err(PipelineError::Tensor(_))));
    }
}
