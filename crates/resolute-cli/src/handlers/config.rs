//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Render the effective engine configuration as YAML
pub fn render_config(config: &CliConfig) -> CliResult<String> {
    config
        .engine
        .to_yaml()
        .map_err(|e| CliError::config(e.to_string()))
}

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    match &config.config_path {
        Some(path) => println!("Configuration: {}", path.display()),
        None => println!("Configuration: defaults"),
    }
    println!("  Verbosity: {:?}", config.verbosity);
    println!("  Color: {:?}", config.color);

    let weights = &config.engine.scoring;
    if (weights.factor_total() - 1.0).abs() > 1e-9 {
        println!(
            "  Scoring factors sum to {:.2}; presence adds {:.2} (total {:.2})",
            weights.factor_total(),
            weights.presence,
            weights.total()
        );
    }

    if args.show {
        println!();
        print!("{}", render_config(config)?);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use resolute::ResoluteConfig;

    #[test]
    fn test_render_round_trips() {
        let config = CliConfig::new().with_engine(ResoluteConfig::default().with_threshold(0.7));
        let yaml = render_config(&config).unwrap();
        assert!(yaml.contains("score_threshold: 0.7"));
        assert_eq!(ResoluteConfig::from_yaml(&yaml).unwrap(), config.engine);
    }
}
