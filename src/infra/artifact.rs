// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// One fitted pipeline lives in one JSON file:
//
//   artifacts/
//     model.json          ← schema id, preprocessing, target scaler,
//                           network config + burn record bytes,
//                           held-out metrics
//     train_config.json   ← the TrainConfig the run used
//
// The network weights go through Burn's BinBytesRecorder at full
// precision so a reload predicts exactly what the saved model did.
//
// Loading refuses an artifact whose schema id or feature list
// differs from the one compiled into this binary.

use std::{
    fs,
    path::PathBuf,
};

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::domain::schema::{schema_id, FEATURE_NAMES};
use crate::error::PipelineError;
use crate::ml::evaluation::Evaluation;
use crate::ml::model::{HyperParams, MlpConfig, MlpRecord};
use crate::ml::pipeline::SleepPipeline;
use crate::ml::preprocess::FittedPreprocessor;
use crate::ml::scaler::RobustScaler;
use crate::ml::trainer::InferBackend;

const MODEL_FILE: &str = "model.json";
const CONFIG_FILE: &str = "train_config.json";

#[derive(Serialize, Deserialize)]
struct NetworkBlob {
    config:  MlpConfig,
    weights: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    schema_id:     String,
    feature_names: Vec<String>,
    params:        HyperParams,
    preprocessor:  FittedPreprocessor,
    target_scaler: RobustScaler,
    network:       NetworkBlob,
    evaluation:    Option<Evaluation>,
}

/// A pipeline read back from disk, with the metrics it was saved with.
pub struct StoredModel {
    pub pipeline:   SleepPipeline,
    pub evaluation: Option<Evaluation>,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn save(&self, pipeline: &SleepPipeline, evaluation: Option<Evaluation>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))?;

        let weights: Vec<u8> = BinBytesRecorder::<FullPrecisionSettings>::default()
            .record(pipeline.network.clone().into_record(), ())
            .map_err(|e| PipelineError::Tensor(format!("cannot record network: {e:?}")))?;

        let artifact = ModelArtifact {
            schema_id:     schema_id(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            params:        pipeline.params.clone(),
            preprocessor:  pipeline.preprocessor.clone(),
            target_scaler: pipeline.target_scaler.clone(),
            network: NetworkBlob {
                config: MlpConfig::new(pipeline.preprocessor.width(), pipeline.params.hidden_layer_sizes.clone()),
                weights,
            },
            evaluation,
        };

        let path = self.model_path();
        let json = serde_json::to_string(&artifact)?;
        fs::write(&path, json).with_context(|| format!("Failed to write model to '{}'", path.display()))?;

        tracing::info!("Saved model artifact to '{}'", path.display());
        Ok(path)
    }

    pub fn load(&self) -> Result<StoredModel> {
        let path = self.model_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read model from '{}'. Have you run 'train' first?", path.display())
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a model artifact", path.display()))?;

        let expected = schema_id();
        if artifact.schema_id != expected || artifact.feature_names != FEATURE_NAMES {
            return Err(PipelineError::SchemaMismatch {
                expected,
                found: artifact.schema_id,
            }
            .into());
        }
        artifact.preprocessor.validate()?;
        if artifact.network.config.input_size != artifact.preprocessor.width() {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("network input width {}", artifact.preprocessor.width()),
                found:    format!("network input width {}", artifact.network.config.input_size),
            }
            .into());
        }

        let device = Default::default();
        let record: MlpRecord<InferBackend> = BinBytesRecorder::<FullPrecisionSettings>::default()
            .load(artifact.network.weights, &device)
            .map_err(|e| PipelineError::Tensor(format!("cannot restore network: {e:?}")))?;
        let network = artifact
            .network
            .config
            .init::<InferBackend>(&device)
            .load_record(record);

        tracing::debug!("Loaded model artifact from '{}'", path.display());
        Ok(StoredModel {
            pipeline: SleepPipeline {
                params: artifact.params,
                preprocessor: artifact.preprocessor,
                target_scaler: artifact.target_scaler,
                network,
            },
            evaluation: artifact.evaluation,
        })
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json).with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}
