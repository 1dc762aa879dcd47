use super::{choose, ensure_candidates, GlobalRandom, RandomSource};
use crate::{
    error::{Result, SampleError},
    SampledArchitecture,
};

/// Width of a single attention head; the QKV size is derived from it.
pub const HEAD_DIM: usize = 64;

/// Sample an architecture for masked-language-model pretraining from the
/// process-wide generator.
pub fn sample_for_mlm(
    layer_numbers: &[usize],
    hidden_sizes: &[usize],
    ffn_sizes: &[usize],
    head_numbers: &[usize],
    seed: Option<u64>,
) -> Result<SampledArchitecture> {
    sample_for_mlm_with(
        &mut GlobalRandom,
        layer_numbers,
        hidden_sizes,
        ffn_sizes,
        head_numbers,
        seed,
    )
}

/// Same as [`sample_for_mlm`], drawing from `source`.
pub fn sample_for_mlm_with<R: RandomSource + ?Sized>(
    source: &mut R,
    layer_numbers: &[usize],
    hidden_sizes: &[usize],
    ffn_sizes: &[usize],
    head_numbers: &[usize],
    seed: Option<u64>,
) -> Result<SampledArchitecture> {
    ensure_candidates(&[
        ("layer_numbers", layer_numbers),
        ("hidden_sizes", hidden_sizes),
        ("ffn_sizes", ffn_sizes),
        ("head_numbers", head_numbers),
    ])?;
    if let Some(&value) = head_numbers
        .iter()
        .find(|head| head.checked_mul(HEAD_DIM).is_none())
    {
        return Err(SampleError::SizeOverflow {
            field: "head_numbers",
            value,
        });
    }

    if let Some(seed) = seed {
        source.reseed(seed);
    }

    let layer_num = choose(source, "layer_numbers", layer_numbers)?;
    let head_num = choose(source, "head_numbers", head_numbers)?;
    let hidden_size = choose(source, "hidden_sizes", hidden_sizes)?;
    let ffn_size = choose(source, "ffn_sizes", ffn_sizes)?;

    log::trace!(
        "mlm sample: {layer_num} layers, {head_num} heads, hidden {hidden_size}, ffn {ffn_size}"
    );

    Ok(SampledArchitecture {
        sample_layer_num: layer_num,
        sample_hidden_size: hidden_size,
        sample_intermediate_sizes: vec![ffn_size; layer_num],
        sample_num_attention_heads: vec![head_num; layer_num],
        sample_qkv_sizes: vec![head_num * HEAD_DIM; layer_num],
    })
}
