use super::{choose, ensure_candidates, GlobalRandom, RandomSource};
use crate::{error::Result, SampledArchitecture};

/// Attention heads per layer of every distillation student.
pub const DISTILL_NUM_HEADS: usize = 12;

/// Sample a student architecture for knowledge distillation from the
/// process-wide generator.
///
/// With `seed` set, the generator is reseeded first, which also fixes every
/// later draw on this thread.
pub fn sample_for_distillation(
    layer_numbers: &[usize],
    hidden_sizes: &[usize],
    ffn_sizes: &[usize],
    qkv_sizes: &[usize],
    seed: Option<u64>,
) -> Result<SampledArchitecture> {
    sample_for_distillation_with(
        &mut GlobalRandom,
        layer_numbers,
        hidden_sizes,
        ffn_sizes,
        qkv_sizes,
        seed,
    )
}

/// Same as [`sample_for_distillation`], drawing from `source`.
pub fn sample_for_distillation_with<R: RandomSource + ?Sized>(
    source: &mut R,
    layer_numbers: &[usize],
    hidden_sizes: &[usize],
    ffn_sizes: &[usize],
    qkv_sizes: &[usize],
    seed: Option<u64>,
) -> Result<SampledArchitecture> {
    ensure_candidates(&[
        ("layer_numbers", layer_numbers),
        ("hidden_sizes", hidden_sizes),
        ("ffn_sizes", ffn_sizes),
        ("qkv_sizes", qkv_sizes),
    ])?;

    if let Some(seed) = seed {
        source.reseed(seed);
    }

    let layer_num = choose(source, "layer_numbers", layer_numbers)?;
    let hidden_size = choose(source, "hidden_sizes", hidden_sizes)?;
    let ffn_size = choose(source, "ffn_sizes", ffn_sizes)?;
    let qkv_size = choose(source, "qkv_sizes", qkv_sizes)?;

    log::trace!(
        "distill sample: {layer_num} layers, hidden {hidden_size}, ffn {ffn_size}, qkv {qkv_size}"
    );

    Ok(SampledArchitecture {
        sample_layer_num: layer_num,
        sample_hidden_size: hidden_size,
        sample_intermediate_sizes: vec![ffn_size; layer_num],
        sample_num_attention_heads: vec![DISTILL_NUM_HEADS; layer_num],
        sample_qkv_sizes: vec![qkv_size; layer_num],
    })
}
