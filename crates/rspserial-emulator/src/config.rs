use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rspserial_message::ModelMeta;

use crate::error::{EmulatorError, Result};

/// TCP port the emulator listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 50001;
pub const DEFAULT_POWER_ON_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    pub meta: Arc<ModelMeta>,
    /// Display names keyed by standard source name, e.g. `" CD" -> "CD ALIAS"`.
    pub aliases: HashMap<String, String>,
    /// Start powered on.
    pub is_on: bool,
    /// Boot time between power-on and the first feedback message.
    pub power_on_delay: Duration,
    /// How often the display alternates while muted.
    pub blink_interval: Duration,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::new(ModelMeta::rsp1570())
    }
}

impl EmulatorConfig {
    pub fn new(meta: Arc<ModelMeta>) -> Self {
        Self {
            meta,
            aliases: HashMap::new(),
            is_on: false,
            power_on_delay: DEFAULT_POWER_ON_DELAY,
            blink_interval: DEFAULT_BLINK_INTERVAL,
        }
    }

    pub fn with_alias(mut self, source: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.insert(source.into(), alias.into());
        self
    }

    pub fn powered_on(mut self, is_on: bool) -> Self {
        self.is_on = is_on;
        self
    }

    pub fn with_power_on_delay(mut self, delay: Duration) -> Self {
        self.power_on_delay = delay;
        self
    }

    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }

    /// Every alias must name one of the model's sources.
    pub fn validate(&self) -> Result<()> {
        match self
            .aliases
            .keys()
            .find(|source| self.meta.source_by_name(source).is_none())
        {
            Some(source) => Err(EmulatorError::UnknownSource(source.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EmulatorConfig::default();
        assert_eq!(config.meta.name, "rsp1570");
        assert!(!config.is_on);
        assert_eq!(config.power_on_delay, Duration::from_millis(1500));
        assert_eq!(config.blink_interval, Duration::from_millis(500));
        config.validate().unwrap();
    }

    #[test]
    fn alias_must_name_a_source() {
        let config = EmulatorConfig::default().with_alias(" CD", "CD ALIAS");
        config.validate().unwrap();

        let config = EmulatorConfig::default().with_alias("VIDEO 6", "GAME");
        assert!(matches!(config.validate(), Err(EmulatorError::UnknownSource(s)) if s == "VIDEO 6"));
        EmulatorConfig::new(ModelMeta::rsp1572())
            .with_alias("VIDEO 6", "GAME")
            .validate()
            .unwrap();
    }
}
