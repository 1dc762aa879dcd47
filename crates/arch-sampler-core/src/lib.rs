use std::sync::Arc;

use derivative::Derivative;
use flume::{Receiver, Sender};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::sampler::RandomSource;

pub mod error;
pub mod sampler;

pub use error::{Result, SampleError};
pub use sampler::{
    distill::{sample_for_distillation, sample_for_distillation_with},
    mlm::{sample_for_mlm, sample_for_mlm_with},
    GlobalRandom,
};

/// One sampled sub-network configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledArchitecture {
    /// Number of transformer layers.
    pub sample_layer_num: usize,
    /// Hidden dimension shared by all layers.
    pub sample_hidden_size: usize,
    /// Feed-forward size of each layer.
    pub sample_intermediate_sizes: Vec<usize>,
    /// Attention head count of each layer.
    pub sample_num_attention_heads: Vec<usize>,
    /// Query/key/value projection size of each layer.
    pub sample_qkv_sizes: Vec<usize>,
}

impl SampledArchitecture {
    /// Whether every per-layer sequence has one entry per layer and repeats a single value.
    pub fn is_consistent(&self) -> bool {
        [
            &self.sample_intermediate_sizes,
            &self.sample_num_attention_heads,
            &self.sample_qkv_sizes,
        ]
        .into_iter()
        .all(|layers| layers.len() == self.sample_layer_num && layers.iter().all_equal())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchKind {
    /// Student for knowledge distillation; QKV size is sampled, heads are fixed.
    #[default]
    Distill,
    /// Masked-language-model pretraining; QKV size follows the head count.
    Mlm,
}

/// Candidate sets for every searchable dimension.
#[derive(Debug, Clone, PartialEq, Eq, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct SearchSpace {
    #[derivative(Default(value = "(1..=8).collect()"))]
    pub layer_numbers: Vec<usize>,
    #[derivative(Default(value = "(128..=768).step_by(64).collect()"))]
    pub hidden_sizes: Vec<usize>,
    #[derivative(Default(value = "(128..=3072).step_by(128).collect()"))]
    pub ffn_sizes: Vec<usize>,
    /// Only used by [`ArchKind::Distill`].
    #[derivative(Default(value = "(180..=768).step_by(12).collect()"))]
    pub qkv_sizes: Vec<usize>,
    /// Only used by [`ArchKind::Mlm`].
    #[derivative(Default(value = "(1..=12).collect()"))]
    pub head_numbers: Vec<usize>,
}

impl SearchSpace {
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        kind: ArchKind,
        source: &mut R,
        seed: Option<u64>,
    ) -> Result<SampledArchitecture> {
        let SearchSpace {
            layer_numbers,
            hidden_sizes,
            ffn_sizes,
            qkv_sizes,
            head_numbers,
        } = self;
        match kind {
            ArchKind::Distill => sample_for_distillation_with(
                source,
                layer_numbers,
                hidden_sizes,
                ffn_sizes,
                qkv_sizes,
                seed,
            ),
            ArchKind::Mlm => sample_for_mlm_with(
                source,
                layer_numbers,
                hidden_sizes,
                ffn_sizes,
                head_numbers,
                seed,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ArchRequest {
    /// Sample one architecture from the space.
    Sample {
        kind: ArchKind,
        space: Arc<SearchSpace>,
        /// Reseed the shared generator before this draw.
        seed: Option<u64>,
        sender: Sender<Result<SampledArchitecture>>,
    },
    /// Reseed the shared generator.
    Reseed(u64),
}

/// Serve sampling requests from one generator until every sender is gone.
///
/// Requests are handled strictly one at a time, so producers on any thread
/// observe a single reproducible stream once it has been reseeded.
pub async fn sampler_route(receiver: Receiver<ArchRequest>) {
    let mut rng = fastrand::Rng::new();

    loop {
        let Ok(request) = receiver.recv_async().await else {
            log::info!("sampler exit");
            break;
        };

        match request {
            ArchRequest::Sample {
                kind,
                space,
                seed,
                sender,
            } => {
                let result = space.sample(kind, &mut rng, seed);
                if let Err(err) = &result {
                    log::warn!("{kind:?} sample rejected: {err}");
                }
                let _ = sender.send(result);
            }
            ArchRequest::Reseed(seed) => {
                log::info!("sampler reseeded with {seed}");
                rng.reseed(seed);
            }
        }
    }
}
