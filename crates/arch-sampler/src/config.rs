use arch_sampler_core::{ArchKind, SearchSpace};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub space: SearchSpace,
    pub sample: SampleOption,
}

#[derive(Debug, Derivative, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct SampleOption {
    /// Which sampler to run (`distill` or `mlm`).
    pub mode: ArchKind,
    /// Number of architectures to emit.
    #[derivative(Default(value = "1"))]
    pub count: usize,
    /// Seed for a reproducible run.
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [space]
            layer_numbers = [4, 6]
            hidden_sizes = [512, 768]
            ffn_sizes = [2048, 3072]
            qkv_sizes = [384, 768]
            head_numbers = [8, 12]

            [sample]
            mode = "mlm"
            count = 5
            seed = 2021
            "#,
        )
        .unwrap();

        assert_eq!(config.space.layer_numbers, vec![4, 6]);
        assert_eq!(config.space.head_numbers, vec![8, 12]);
        assert_eq!(
            config.sample,
            SampleOption {
                mode: ArchKind::Mlm,
                count: 5,
                seed: Some(2021),
            }
        );
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[space]\nlayer_numbers = [3]\n").unwrap();
        assert_eq!(config.space.layer_numbers, vec![3]);
        assert_eq!(config.space.ffn_sizes, SearchSpace::default().ffn_sizes);
        assert_eq!(config.sample, SampleOption::default());
        assert_eq!(config.sample.count, 1);
        assert_eq!(config.sample.mode, ArchKind::Distill);
    }

    #[test]
    fn shipped_config_matches_default_space() {
        let config: Config =
            toml::from_str(include_str!("../../../assets/configs/Sampler.toml")).unwrap();
        assert_eq!(config.space, SearchSpace::default());
        assert_eq!(config.space.qkv_sizes.len(), 50);
        assert_eq!(config.sample, SampleOption::default());
    }
}
