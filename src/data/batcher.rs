// ============================================================
// Layer 4 — Survey Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SurveyRow>
// (already preprocessed and target-scaled) into the two tensors
// one training step needs.
//
//   Input:  N SurveyRows, each with D features and one target
//   Output: SurveyBatch { x: [N, D], y: [N, 1] }
//
// Every row carries the same width, so the features are
// flattened row by row and reshaped.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SurveyRow;

/// A minibatch ready for the network's forward pass.
#[derive(Debug, Clone)]
pub struct SurveyBatch<B: Backend> {
    /// Encoded features — shape: [batch_size, width]
    pub x: Tensor<B, 2>,

    /// Scaled sleep hours — shape: [batch_size, 1]
    pub y: Tensor<B, 2>,
}

/// Holds the device the batch tensors are created on.
#[derive(Clone, Debug)]
pub struct SurveyBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SurveyBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SurveyRow, SurveyBatch<B>> for SurveyBatcher<B> {
    fn batch(&self, items: Vec<SurveyRow>) -> SurveyBatch<B> {
        let width = items.first().map_or(0, |r| r.features.len());

        let features: Vec<Vec<f32>> = items.iter().map(|r| r.features.clone()).collect();
        let targets:  Vec<f32>      = items.iter().map(|r| r.target).collect();

        SurveyBatch {
            x: rows_to_tensor(&features, width, &self.device),
            y: Tensor::<B, 2>::from_data(TensorData::new(targets, [items.len(), 1]), &self.device),
        }
    }
}

/// Stack equal-width rows into a `[rows, width]` float tensor.
pub fn rows_to_tensor<B: Backend>(rows: &[Vec<f32>], width: usize, device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Tensor::<B, 2>::from_data(TensorData::new(flat, [rows.len(), width]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn row(features: &[f32], target: f32) -> SurveyRow {
        SurveyRow { features: features.to_vec(), target }
    }

    #[test]
    fn test_rows_become_matrix() {
        let device = Default::default();
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let t = rows_to_tensor::<NdArray>(&rows, 3, &device);
        assert_eq!(t.dims(), [2, 3]);
        let values = t.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_batch_stacks_features_and_targets() {
        let batcher = SurveyBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![row(&[1.0, 2.0], 0.5), row(&[3.0, 4.0], -0.5), row(&[5.0, 6.0], 1.5)]);

        assert_eq!(batch.x.dims(), [3, 2]);
        assert_eq!(batch.y.dims(), [3, 1]);
        assert_eq!(batch.x.into_data().to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(batch.y.into_data().to_vec::<f32>().unwrap(), vec![0.5, -0.5, 1.5]);
    }
}
