// ============================================================
// Layer 5 — Network Training Loop
// ============================================================
// Fits one MLP for one hyperparameter point.
//
//   - a `validation_fraction` holdout is cut from the rows it is
//     given (seeded); the rest is served by Burn's DataLoader in
//     shuffled minibatches of at most `batch_size`
//   - loss = ½·MSE + alpha·Σ‖W‖² / (2·batch)
//   - Adam (β1 .9, β2 .999, ε 1e-8) or SGD with Nesterov
//     momentum .9, at a constant learning rate
//   - after every epoch the holdout loss is checked; training
//     stops after `n_iter_no_change` epochs without an
//     improvement larger than `tol`, and the best holdout
//     weights are returned
//   - a non-finite loss fails the fit
//
// Training runs on Autodiff<NdArray>; model.valid() and the
// holdout loader run on the inner NdArray backend.

use burn::{
    backend::{Autodiff, NdArray},
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{momentum::MomentumConfig, AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::batcher::{rows_to_tensor, SurveyBatcher};
use crate::data::dataset::{RowDataset, SurveyRow};
use crate::error::{PipelineError, Result};
use crate::ml::model::{Activation, HyperParams, Mlp, MlpConfig, Solver};

pub type TrainBackend = Autodiff<NdArray>;
pub type InferBackend = NdArray;

/// Settings shared by every fit in a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSettings {
    pub batch_size:          usize,
    pub validation_fraction: f64,
    pub n_iter_no_change:    usize,
    pub tol:                 f64,
    pub seed:                u64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            batch_size:          200,
            validation_fraction: 0.2,
            n_iter_no_change:    10,
            tol:                 1e-4,
            seed:                42,
        }
    }
}

/// How a fit ended.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub epochs_run:    usize,
    pub best_loss:     f64,
    pub stopped_early: bool,
}

/// Training rows already preprocessed and target-scaled.
pub struct TrainingData<'a> {
    pub rows:    &'a [Vec<f32>],
    pub width:   usize,
    pub targets: &'a [f32],
}

/// Fit a fresh network for `params` on `data`.
pub fn fit_network(
    params:   &HyperParams,
    data:     &TrainingData<'_>,
    settings: &FitSettings,
) -> Result<(Mlp<InferBackend>, FitReport)> {
    let n = data.rows.len();
    let n_val = if settings.validation_fraction > 0.0 {
        ((n as f64) * settings.validation_fraction).ceil() as usize
    } else {
        0
    };
    if n < 1 || n <= n_val {
        return Err(PipelineError::InsufficientData(format!(
            "{n} rows cannot provide a {n_val}-row validation holdout and a training set"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(settings.seed));
    let (val_idx, train_idx) = order.split_at(n_val);

    let pick = |idx: &[usize]| {
        idx.iter()
            .map(|&i| SurveyRow { features: data.rows[i].clone(), target: data.targets[i] })
            .collect::<Vec<_>>()
    };
    let split = Split { train: pick(train_idx), val: pick(val_idx) };

    TrainBackend::seed(settings.seed);
    let device = Default::default();
    let model: Mlp<TrainBackend> =
        MlpConfig::new(data.width, params.hidden_layer_sizes.clone()).init(&device);

    match params.solver {
        Solver::Adam => {
            let optim = AdamConfig::new().with_epsilon(1e-8).init();
            run_epochs(model, optim, params, split, settings, &device)
        }
        Solver::Sgd => {
            let momentum = MomentumConfig::new()
                .with_momentum(0.9)
                .with_dampening(0.0)
                .with_nesterov(true);
            let optim = SgdConfig::new().with_momentum(Some(momentum)).init();
            run_epochs(model, optim, params, split, settings, &device)
        }
    }
}

struct Split {
    train: Vec<SurveyRow>,
    val:   Vec<SurveyRow>,
}

fn run_epochs<O>(
    mut model: Mlp<TrainBackend>,
    mut optim: O,
    params:    &HyperParams,
    split:     Split,
    settings:  &FitSettings,
    device:    &<TrainBackend as Backend>::Device,
) -> Result<(Mlp<InferBackend>, FitReport)>
where
    O: Optimizer<Mlp<TrainBackend>, TrainBackend>,
{
    let n_train   = split.train.len();
    let has_val   = !split.val.is_empty();
    let batch_size = settings.batch_size.min(n_train).max(1);
    let mse = MseLoss::new();

    // ── Training loader (autodiff backend, reshuffled every epoch) ───────────
    let train_loader = DataLoaderBuilder::new(SurveyBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(batch_size)
        .shuffle(settings.seed.wrapping_add(1))
        .num_workers(1)
        .build(RowDataset::new(split.train));

    // ── Holdout loader (inner backend, fixed order) ──────────────────────────
    let val_loader = DataLoaderBuilder::new(SurveyBatcher::<InferBackend>::new(device.clone()))
        .batch_size(batch_size)
        .num_workers(1)
        .build(RowDataset::new(split.val));

    let mut best_loss  = f64::INFINITY;
    let mut best_model: Option<Mlp<InferBackend>> = None;
    let mut no_improve = 0usize;
    let mut epochs_run = 0usize;
    let mut stopped_early = false;

    for _epoch in 1..=params.max_epochs {
        epochs_run += 1;
        let mut epoch_loss_sum = 0.0f64;

        for batch in train_loader.iter() {
            let rows = batch.x.dims()[0];

            let pred    = model.forward(batch.x, params.activation);
            let half    = mse.forward(pred, batch.y, Reduction::Mean).div_scalar(2.0);
            let penalty = model
                .weight_norm_sq()
                .mul_scalar(params.alpha / (2.0 * rows as f64));
            let loss = half + penalty;

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            if !loss_val.is_finite() {
                return Err(PipelineError::CandidateFailed {
                    params: params.to_string(),
                    reason: format!("non-finite training loss at epoch {epochs_run}"),
                });
            }
            epoch_loss_sum += loss_val * rows as f64;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(params.learning_rate_init, model, grads);
        }

        // Holdout loss when there is a holdout, otherwise the training loss.
        let monitored = if has_val {
            let valid = model.valid();
            let mut sq_sum = 0.0f64;
            let mut count  = 0usize;
            for batch in val_loader.iter() {
                count += batch.y.dims()[0];
                let pred = valid.forward(batch.x, params.activation);
                sq_sum += mse.forward(pred, batch.y, Reduction::Sum).into_scalar().elem::<f64>();
            }
            sq_sum / (2.0 * count.max(1) as f64)
        } else {
            epoch_loss_sum / n_train as f64
        };

        if monitored < best_loss - settings.tol {
            best_loss  = monitored;
            best_model = Some(model.valid());
            no_improve = 0;
        } else {
            no_improve += 1;
        }
        if no_improve >= settings.n_iter_no_change {
            stopped_early = true;
            tracing::debug!("Early stop after {epochs_run} epochs ({params})");
            break;
        }
    }

    let network = best_model.unwrap_or_else(|| model.valid());
    Ok((network, FitReport { epochs_run, best_loss, stopped_early }))
}

/// Forward `rows` through a trained network; outputs stay target-scaled.
pub fn predict_scaled(
    network: &Mlp<InferBackend>,
    act:     Activation,
    rows:    &[Vec<f32>],
    width:   usize,
) -> Result<Vec<f32>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let device = Default::default();
    let x = rows_to_tensor::<InferBackend>(rows, width, &device);
    network
        .forward(x, act)
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| PipelineError::Tensor(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_mse(preds: &[f32], targets: &[f32]) -> f64 {
        let sum: f64 = preds
            .iter()
            .zip(targets)
            .map(|(p, t)| (f64::from(*p) - f64::from(*t)).powi(2))
            .sum();
        sum / (2.0 * targets.len().max(1) as f64)
    }

    fn params(solver: Solver, epochs: usize) -> HyperParams {
        HyperParams {
            hidden_layer_sizes: vec![8],
            activation:         Activation::Tanh,
            alpha:              1e-4,
            learning_rate_init: 1e-2,
            solver,
            max_epochs:         epochs,
        }
    }

    // y = x0 - x1 on a small grid
    fn linear_data() -> (Vec<Vec<f32>>, Vec<f32>) {
        let mut rows = Vec::new();
        let mut ys   = Vec::new();
        for i in 0..8 {
            for j in 0..5 {
                let a = i as f32 / 4.0 - 1.0;
                let b = j as f32 / 2.0 - 1.0;
                rows.push(vec![a, b]);
                ys.push(a - b);
            }
        }
        (rows, ys)
    }

    #[test]
    fn test_adam_fit_reduces_loss() {
        let (rows, ys) = linear_data();
        let data = TrainingData { rows: &rows, width: 2, targets: &ys };
        let (net, report) = fit_network(&params(Solver::Adam, 200), &data, &FitSettings::default()).unwrap();

        let baseline = half_mse(&vec![0.0; ys.len()], &ys);
        let preds    = predict_scaled(&net, Activation::Tanh, &rows, 2).unwrap();
        assert!(report.epochs_run >= 1);
        assert!(half_mse(&preds, &ys) < baseline);
    }

    #[test]
    fn test_sgd_fit_returns_finite_predictions() {
        let (rows, ys) = linear_data();
        let data = TrainingData { rows: &rows, width: 2, targets: &ys };
        let (net, _) = fit_network(&params(Solver::Sgd, 20), &data, &FitSettings::default()).unwrap();
        let preds = predict_scaled(&net, Activation::Tanh, &rows, 2).unwrap();
        assert_eq!(preds.len(), rows.len());
        assert!(preds.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_early_stopping_caps_epochs() {
        let (rows, ys) = linear_data();
        let data = TrainingData { rows: &rows, width: 2, targets: &ys };
        let settings = FitSettings { n_iter_no_change: 1, tol: 1e9, ..FitSettings::default() };
        let (_, report) = fit_network(&params(Solver::Adam, 50), &data, &settings).unwrap();
        // the first epoch improves on +inf, the second cannot beat it by 1e9
        assert_eq!(report.epochs_run, 2);
        assert!(report.stopped_early);
    }

    #[test]
    fn test_small_batches_train_the_network() {
        let (rows, ys) = linear_data();
        let data = TrainingData { rows: &rows, width: 2, targets: &ys };
        // 32 training rows → batches of 7, 7, 7, 7, 4 each epoch
        let settings = FitSettings { batch_size: 7, ..FitSettings::default() };
        let (net, report) = fit_network(&params(Solver::Adam, 100), &data, &settings).unwrap();

        let baseline = half_mse(&vec![0.0; ys.len()], &ys);
        let preds    = predict_scaled(&net, Activation::Tanh, &rows, 2).unwrap();
        assert!(report.best_loss.is_finite());
        assert!(half_mse(&preds, &ys) < baseline);
    }

    #[test]
    fn test_single_row_cannot_hold_out() {
        let rows = vec![vec![0.0, 1.0]];
        let data = TrainingData { rows: &rows, width: 2, targets: &[1.0] };
        assert!(matches!(
            fit_network(&params(Solver::Adam, 5), &data, &FitSettings::default()),
            Err(PipelineError::InsufficientData(_))
        ));
    }
}
