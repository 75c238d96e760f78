use std::path::Path;
use std::time::Duration;

use crate::api::controller_config_dto::ControllerConfigDto;
use crate::domain::options::node_options::NodeOptions;
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposerConfig {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// How often the worker looks for due tasks.
    pub tick: Duration,
}

impl Default for DisposerConfig {
    fn default() -> Self {
        DisposerConfig { initial_backoff: Duration::from_secs(10), max_backoff: Duration::from_secs(600), tick: Duration::from_secs(1) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Plugin-wide defaults; also the base for options rebuilt from legacy records.
    pub default_options: NodeOptions,
    pub disposer: DisposerConfig,
}

impl ControllerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let dto: ControllerConfigDto = parse_json_file(path)?;
        ControllerConfig::try_from(dto)
    }
}

impl TryFrom<ControllerConfigDto> for ControllerConfig {
    type Error = Error;

    fn try_from(dto: ControllerConfigDto) -> Result<Self> {
        let default_options = match dto.default_options {
            Some(options) => options.overlay(NodeOptions::default().to_builder()).build()?,
            None => NodeOptions::default(),
        };

        let mut disposer = DisposerConfig::default();
        if let Some(disposer_dto) = dto.disposer {
            if let Some(ms) = disposer_dto.initial_backoff_ms {
                disposer.initial_backoff = Duration::from_millis(ms);
            }
            if let Some(ms) = disposer_dto.max_backoff_ms {
                disposer.max_backoff = Duration::from_millis(ms);
            }
            if let Some(ms) = disposer_dto.tick_ms {
                disposer.tick = Duration::from_millis(ms);
            }
        }

        if disposer.tick.is_zero() {
            return Err(Error::InvalidConfig("disposer tick must be positive".to_string()));
        }
        if disposer.max_backoff < disposer.initial_backoff {
            return Err(Error::InvalidConfig(format!(
                "disposer maxBackoffMs ({}) is below initialBackoffMs ({})",
                disposer.max_backoff.as_millis(),
                disposer.initial_backoff.as_millis()
            )));
        }

        Ok(ControllerConfig { default_options, disposer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::launcher_factory::LauncherFactory;

    #[test]
    fn partial_document_overlays_builtin_defaults() {
        let json = r#"{
            "defaultOptions": { "retentionTime": 5, "launcherFactory": { "type": "SSH", "credentialsId": "key" } },
            "disposer": { "initialBackoffMs": 250 }
        }"#;
        let dto: ControllerConfigDto = serde_json::from_str(json).unwrap();
        let config = ControllerConfig::try_from(dto).unwrap();

        assert_eq!(config.default_options.retention_time, 5);
        assert_eq!(config.default_options.num_executors, 1);
        assert_eq!(config.default_options.launcher_factory(), LauncherFactory::Ssh { credentials_id: Some("key".into()) });
        assert_eq!(config.disposer.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.disposer.max_backoff, DisposerConfig::default().max_backoff);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let dto: ControllerConfigDto = serde_json::from_str("{}").unwrap();
        assert_eq!(ControllerConfig::try_from(dto).unwrap(), ControllerConfig::default());
    }

    #[test]
    fn inverted_backoff_bounds_are_rejected() {
        let dto: ControllerConfigDto = serde_json::from_str(r#"{ "disposer": { "initialBackoffMs": 500, "maxBackoffMs": 100 } }"#).unwrap();
        assert!(matches!(ControllerConfig::try_from(dto), Err(Error::InvalidConfig(_))));
    }
}
