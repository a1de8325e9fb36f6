use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{MessageError, Result};
use crate::tables::{volume_direct_commands, RSP1570_COMMANDS, RSP1572_COMMANDS};

pub const INITIAL_VOLUME: u8 = 50;
pub const INITIAL_SOURCE: &str = "VIDEO 1";

pub const RSP1570_DEVICE_ID: u8 = 0xA3;
pub const RSP1570_MIN_VOLUME: u8 = 0x00;
pub const RSP1570_MAX_VOLUME: u8 = 0x60;

pub const RSP1572_DEVICE_ID: u8 = 0xA5;
pub const RSP1572_MIN_VOLUME: u8 = 0x00;
/// Documented maximum for the RSP-1572. The built-in model keeps the RSP-1570
/// bounds, which match observed behaviour.
pub const RSP1572_MAX_VOLUME: u8 = 0x64;

/// Names accepted by [`ModelMeta::by_name`].
pub const MODEL_NAMES: [&str; 2] = ["rsp1570", "rsp1572"];

/// Message type and key byte of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct CommandCode {
    pub message_type: u8,
    pub key: u8,
}

impl CommandCode {
    pub const fn new(message_type: u8, key: u8) -> Self {
        Self { message_type, key }
    }
}

impl From<(u8, u8)> for CommandCode {
    fn from((message_type, key): (u8, u8)) -> Self {
        Self { message_type, key }
    }
}

impl From<CommandCode> for (u8, u8) {
    fn from(code: CommandCode) -> Self {
        (code.message_type, code.key)
    }
}

/// Name ↔ code table for one model, indexable in both directions.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: Vec<(String, CommandCode)>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<CommandCode, usize>,
}

impl CommandTable {
    /// Build a table. Duplicate names are rejected; when two names share a
    /// code the first one wins the reverse lookup.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, CommandCode)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, code) in entries {
            table.insert(name.into(), code)?;
        }
        Ok(table)
    }

    fn insert(&mut self, name: String, code: CommandCode) -> Result<()> {
        if self.by_name.contains_key(&name) {
            return Err(MessageError::Config(format!("duplicate command name {name}")));
        }
        let index = self.entries.len();
        self.by_name.insert(name.clone(), index);
        self.by_code.entry(code).or_insert(index);
        self.entries.push((name, code));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<CommandCode> {
        self.by_name.get(name).map(|&i| self.entries[i].1)
    }

    /// Reverse lookup: the command name for a code.
    pub fn name_of(&self, code: CommandCode) -> Option<&str> {
        self.by_code.get(&code).map(|&i| self.entries[i].0.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CommandCode)> {
        self.entries.iter().map(|(name, code)| (name.as_str(), *code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A selectable input: the name the device uses by default and the command that selects it.
///
/// Sources may be renamed on the device; feedback messages report the alias,
/// not the standard name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub standard_name: String,
    pub command_code: String,
}

impl SourceMeta {
    pub fn new(standard_name: impl Into<String>, command_code: impl Into<String>) -> Self {
        Self {
            standard_name: standard_name.into(),
            command_code: command_code.into(),
        }
    }
}

/// Everything that differs between processor models.
#[derive(Debug, Clone)]
pub struct ModelMeta {
    pub name: String,
    pub device_id: u8,
    pub min_volume: u8,
    pub max_volume: u8,
    pub initial_volume: u8,
    pub initial_source: String,
    pub sources: Vec<SourceMeta>,
    pub commands: CommandTable,
}

/// On-disk form of a [`ModelMeta`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub device_id: u8,
    pub min_volume: u8,
    pub max_volume: u8,
    #[serde(default = "default_initial_volume")]
    pub initial_volume: u8,
    #[serde(default = "default_initial_source")]
    pub initial_source: String,
    pub sources: Vec<SourceMeta>,
    pub commands: BTreeMap<String, CommandCode>,
}

fn default_initial_volume() -> u8 {
    INITIAL_VOLUME
}

fn default_initial_source() -> String {
    INITIAL_SOURCE.to_string()
}

impl ModelMeta {
    /// Built-in RSP-1570 description.
    pub fn rsp1570() -> Arc<ModelMeta> {
        static META: OnceLock<Arc<ModelMeta>> = OnceLock::new();
        META.get_or_init(|| Arc::new(build_rsp1570())).clone()
    }

    /// Built-in RSP-1572 description.
    pub fn rsp1572() -> Arc<ModelMeta> {
        static META: OnceLock<Arc<ModelMeta>> = OnceLock::new();
        META.get_or_init(|| Arc::new(build_rsp1572())).clone()
    }

    /// Look up a built-in model (`rsp1570`, `rsp1572`), case-insensitively.
    pub fn by_name(name: &str) -> Option<Arc<ModelMeta>> {
        match name.to_ascii_lowercase().as_str() {
            "rsp1570" => Some(Self::rsp1570()),
            "rsp1572" => Some(Self::rsp1572()),
            _ => None,
        }
    }

    /// Names of the built-in models.
    pub fn names() -> &'static [&'static str] {
        &MODEL_NAMES
    }

    /// Build and validate a model from its configuration.
    pub fn from_config(config: ModelConfig) -> Result<Self> {
        let commands = CommandTable::new(config.commands)?;
        let meta = Self {
            name: config.name,
            device_id: config.device_id,
            min_volume: config.min_volume,
            max_volume: config.max_volume,
            initial_volume: config.initial_volume,
            initial_source: config.initial_source,
            sources: config.sources,
            commands,
        };
        meta.validate()?;
        Ok(meta)
    }

    /// Parse a JSON model description.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ModelConfig =
            serde_json::from_str(json).map_err(|err| MessageError::Config(err.to_string()))?;
        Self::from_config(config)
    }

    /// Load a JSON model description from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| MessageError::Config(format!("{}: {err}", path.display())))?;
        let meta = Self::from_json(&json)?;
        debug!(path = %path.display(), model = %meta.name, "loaded model description");
        Ok(meta)
    }

    /// Configuration form of this model, e.g. for writing out and editing.
    pub fn to_config(&self) -> ModelConfig {
        ModelConfig {
            name: self.name.clone(),
            device_id: self.device_id,
            min_volume: self.min_volume,
            max_volume: self.max_volume,
            initial_volume: self.initial_volume,
            initial_source: self.initial_source.clone(),
            sources: self.sources.clone(),
            commands: self
                .commands
                .iter()
                .map(|(name, code)| (name.to_string(), code))
                .collect(),
        }
    }

    /// Code for a command name.
    pub fn command(&self, name: &str) -> Option<CommandCode> {
        self.commands.get(name)
    }

    /// Reverse index from code to command name.
    pub fn index_command_messages(&self) -> HashMap<CommandCode, &str> {
        self.commands.iter().map(|(name, code)| (code, name)).collect()
    }

    /// The source selected by a command, if it is a source command.
    pub fn source_for_command(&self, command_code: &str) -> Option<&SourceMeta> {
        self.sources.iter().find(|s| s.command_code == command_code)
    }

    pub fn source_by_name(&self, standard_name: &str) -> Option<&SourceMeta> {
        self.sources.iter().find(|s| s.standard_name == standard_name)
    }

    fn validate(&self) -> Result<()> {
        if self.min_volume > self.max_volume {
            return Err(MessageError::Config(format!(
                "min_volume {} is above max_volume {}",
                self.min_volume, self.max_volume
            )));
        }
        if !(self.min_volume..=self.max_volume).contains(&self.initial_volume) {
            return Err(MessageError::Config(format!(
                "initial_volume {} is outside {}..={}",
                self.initial_volume, self.min_volume, self.max_volume
            )));
        }
        if let Some(source) = self
            .sources
            .iter()
            .find(|s| !self.commands.contains(&s.command_code))
        {
            return Err(MessageError::Config(format!(
                "source '{}' uses unknown command {}",
                source.standard_name, source.command_code
            )));
        }
        if !self.sources.is_empty() && self.source_by_name(&self.initial_source).is_none() {
            return Err(MessageError::Config(format!(
                "initial_source '{}' is not one of the sources",
                self.initial_source
            )));
        }
        Ok(())
    }
}

fn static_entries(
    table: &'static [(&'static str, u8, u8)],
) -> impl Iterator<Item = (String, CommandCode)> {
    table
        .iter()
        .map(|&(name, t, k)| (name.to_string(), CommandCode::new(t, k)))
}

fn build_rsp1570() -> ModelMeta {
    let volume = volume_direct_commands(RSP1570_MIN_VOLUME, RSP1570_MAX_VOLUME)
        .into_iter()
        .map(|(name, t, k)| (name, CommandCode::new(t, k)));
    builtin(
        "rsp1570",
        RSP1570_DEVICE_ID,
        static_entries(RSP1570_COMMANDS).chain(volume),
        vec![
            SourceMeta::new(" CD", "SOURCE_CD"),
            SourceMeta::new("TUNER", "SOURCE_TUNER"),
            SourceMeta::new("TAPE", "SOURCE_TAPE"),
            SourceMeta::new("VIDEO 1", "SOURCE_VIDEO_1"),
            SourceMeta::new("VIDEO 2", "SOURCE_VIDEO_2"),
            SourceMeta::new("VIDEO 3", "SOURCE_VIDEO_3"),
            SourceMeta::new("VIDEO 4", "SOURCE_VIDEO_4"),
            SourceMeta::new("VIDEO 5", "SOURCE_VIDEO_5"),
            SourceMeta::new("MULTI", "SOURCE_MULTI_INPUT"),
        ],
    )
}

fn build_rsp1572() -> ModelMeta {
    builtin(
        "rsp1572",
        RSP1572_DEVICE_ID,
        static_entries(RSP1572_COMMANDS),
        vec![
            SourceMeta::new(" CD", "SOURCE_CD"),
            SourceMeta::new("TUNER", "SOURCE_TUNER"),
            SourceMeta::new("VIDEO 1", "SOURCE_VIDEO_1"),
            SourceMeta::new("VIDEO 2", "SOURCE_VIDEO_2"),
            SourceMeta::new("VIDEO 3", "SOURCE_VIDEO_3"),
            SourceMeta::new("VIDEO 4", "SOURCE_VIDEO_4"),
            SourceMeta::new("VIDEO 5", "SOURCE_VIDEO_5"),
            SourceMeta::new("VIDEO 6", "SOURCE_VIDEO_6"),
            SourceMeta::new("iPod/USB", "SOURCE_IPOD_USB"),
            SourceMeta::new("MULTI", "SOURCE_MULTI_INPUT"),
        ],
    )
}

fn builtin(
    name: &str,
    device_id: u8,
    entries: impl Iterator<Item = (String, CommandCode)>,
    sources: Vec<SourceMeta>,
) -> ModelMeta {
    let commands = CommandTable::new(entries).unwrap_or_else(|err| {
        debug_assert!(false, "built-in {name} command table: {err}");
        error!(model = name, %err, "built-in command table rejected");
        CommandTable::default()
    });
    ModelMeta {
        name: name.to_string(),
        device_id,
        min_volume: RSP1570_MIN_VOLUME,
        max_volume: RSP1570_MAX_VOLUME,
        initial_volume: INITIAL_VOLUME,
        initial_source: INITIAL_SOURCE.to_string(),
        sources,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsp1570_meta() {
        let meta = ModelMeta::rsp1570();
        assert_eq!(meta.device_id, 0xA3);
        assert_eq!((meta.min_volume, meta.max_volume), (0, 96));
        assert_eq!(meta.initial_volume, 50);
        assert_eq!(meta.initial_source, "VIDEO 1");
        assert_eq!(meta.sources.len(), 9);
        assert_eq!(meta.command("POWER_TOGGLE"), Some(CommandCode::new(0x10, 0x0A)));
        assert_eq!(meta.command("VOLUME_40"), Some(CommandCode::new(0x30, 0x28)));
        assert_eq!(meta.command("ZONE_3_VOLUME_36"), Some(CommandCode::new(0x33, 0x24)));
        assert_eq!(meta.command("POWER_OFF_ALL_ZONES"), Some(CommandCode::new(0x10, 0x71)));
        assert_eq!(
            meta.command("ZONE_3_POWER_OFF_ALL_ZONES"),
            Some(CommandCode::new(0x17, 0x71))
        );
        assert!(meta.command("SOURCE_VIDEO_6").is_none());
    }

    #[test]
    fn rsp1572_meta() {
        let meta = ModelMeta::rsp1572();
        assert_eq!(meta.device_id, 0xA5);
        assert_eq!((meta.min_volume, meta.max_volume), (0, 96));
        assert_eq!(meta.sources.len(), 10);
        assert!(meta.source_by_name("TAPE").is_none());
        assert_eq!(meta.command("SOURCE_IPOD_USB"), Some(CommandCode::new(0x10, 0x8E)));
        assert_eq!(
            meta.command("STOP_KEY_RELEASED"),
            Some(CommandCode::new(0x11, 0x87))
        );
        assert_eq!(meta.command("ZONE_4_VOLUME_MAX"), Some(CommandCode::new(0x34, 0x64)));
    }

    #[test]
    fn builtin_tables_have_no_duplicate_names() {
        assert_eq!(
            ModelMeta::rsp1570().commands.len(),
            RSP1570_COMMANDS.len() + 4 * 97
        );
        assert_eq!(ModelMeta::rsp1572().commands.len(), RSP1572_COMMANDS.len());
    }

    #[test]
    fn duplicate_command_names_are_rejected() {
        let entries = [
            ("POWER_ON", CommandCode::new(0x10, 0x4B)),
            ("POWER_ON", CommandCode::new(0x10, 0x4A)),
        ];
        assert!(matches!(CommandTable::new(entries), Err(MessageError::Config(_))));
    }

    #[test]
    fn every_source_has_a_command() {
        for meta in [ModelMeta::rsp1570(), ModelMeta::rsp1572()] {
            for source in &meta.sources {
                assert!(meta.commands.contains(&source.command_code), "{}", source.command_code);
            }
        }
    }

    #[test]
    fn reverse_index() {
        let meta = ModelMeta::rsp1570();
        let index = meta.index_command_messages();
        assert_eq!(index.get(&CommandCode::new(0x10, 0x02)), Some(&"SOURCE_CD"));
        assert_eq!(meta.commands.name_of(CommandCode::new(0x10, 0x4B)), Some("POWER_ON"));
        assert_eq!(meta.commands.name_of(CommandCode::new(0x10, 0xEE)), None);
    }

    #[test]
    fn by_name_lookup() {
        assert_eq!(ModelMeta::by_name("RSP1572").unwrap().device_id, 0xA5);
        assert!(ModelMeta::by_name("rsp1069").is_none());
        for name in MODEL_NAMES {
            assert!(ModelMeta::by_name(name).is_some());
        }
    }

    #[test]
    fn loads_model_from_json() {
        let meta = ModelMeta::from_json(
            r#"{
                "name": "custom",
                "device_id": 163,
                "min_volume": 0,
                "max_volume": 80,
                "sources": [{"standard_name": "TUNER", "command_code": "SOURCE_TUNER"}],
                "initial_source": "TUNER",
                "commands": {"SOURCE_TUNER": [16, 3], "POWER_ON": [16, 75]}
            }"#,
        )
        .unwrap();
        assert_eq!(meta.name, "custom");
        assert_eq!(meta.initial_volume, INITIAL_VOLUME);
        assert_eq!(meta.command("POWER_ON"), Some(CommandCode::new(0x10, 0x4B)));
    }

    #[test]
    fn rejects_source_without_command() {
        let err = ModelMeta::from_json(
            r#"{
                "name": "broken",
                "device_id": 163,
                "min_volume": 0,
                "max_volume": 96,
                "sources": [{"standard_name": "TUNER", "command_code": "SOURCE_TUNER"}],
                "initial_source": "TUNER",
                "commands": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MessageError::Config(msg) if msg.contains("SOURCE_TUNER")));
    }

    #[test]
    fn rejects_bad_volume_bounds() {
        let mut config = ModelMeta::rsp1570().to_config();
        config.initial_volume = 120;
        assert!(ModelMeta::from_config(config).is_err());

        let mut config = ModelMeta::rsp1570().to_config();
        config.min_volume = 97;
        assert!(ModelMeta::from_config(config).is_err());
    }

    #[test]
    fn builtin_config_reloads() {
        let json = serde_json::to_string(&ModelMeta::rsp1572().to_config()).unwrap();
        let meta = ModelMeta::from_json(&json).unwrap();
        assert_eq!(meta.device_id, 0xA5);
        assert_eq!(meta.commands.len(), ModelMeta::rsp1572().commands.len());
        assert_eq!(meta.sources, ModelMeta::rsp1572().sources);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ModelMeta::from_json("{not json"),
            Err(MessageError::Config(_))
        ));
    }
}
