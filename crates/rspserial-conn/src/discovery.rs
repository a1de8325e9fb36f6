//! Source alias discovery.
//!
//! Sources can be renamed on the device and feedback messages only report
//! the alias. Discovery selects every source in turn and records the name the
//! display shows, then puts the device back the way it was found.
//!
//! The device is powered on (and back off) if it starts off, and is muted
//! while sources are cycled.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use rspserial_message::{DisplayState, Message, ModelMeta};
use rspserial_transport::ConnectOptions;
use tracing::{info, warn};

use crate::connection::AmpConnection;
use crate::error::DiscoveryError;
use crate::process::CommandWindows;
use crate::shared::{ClientConnection, SharedConnection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub windows: CommandWindows,
    /// Limit on opening the link in [`discover_source_aliases_at`].
    pub open_timeout: Option<Duration>,
}

/// Display state from the newest feedback message in a batch.
///
/// Several feedback messages can follow one command (a source change may
/// switch sound mode, a muted display blinks), and a slow line can push a
/// late message from the previous command into this window. The newest one
/// is the safest to trust.
fn newest_display(messages: &[Message], command: &str) -> Result<DisplayState, DiscoveryError> {
    messages
        .iter()
        .rev()
        .find_map(Message::as_feedback)
        .map(|feedback| feedback.parse_display_lines())
        .ok_or_else(|| DiscoveryError::NoFeedback {
            command: command.to_string(),
        })
}

fn source_alias(messages: &[Message], command: &str) -> Result<String, DiscoveryError> {
    newest_display(messages, command)?
        .source_name
        .ok_or_else(|| DiscoveryError::NoFeedback {
            command: command.to_string(),
        })
}

/// Map every source alias shown by the device to the command that selects it.
pub async fn discover_source_aliases(
    conn: &mut ClientConnection,
    config: &DiscoveryConfig,
) -> Result<BTreeMap<String, String>, DiscoveryError> {
    let windows = config.windows;
    let meta = Arc::clone(conn.codec().meta());

    // A device that is off does not answer a refresh.
    let mut command = "DISPLAY_REFRESH";
    let mut messages = conn.process_command(command, windows.default_window).await?;
    let was_probably_off = !messages.iter().any(|m| m.as_feedback().is_some());
    info!(was_probably_off, "probed power state");

    if was_probably_off {
        // Powering on also unmutes.
        info!("power appears to be off, turning on");
        command = "POWER_ON";
        messages = conn.process_command(command, windows.window_for(command)).await?;
    }

    let original = newest_display(&messages, command)?;
    let original_alias = original.source_name.ok_or_else(|| DiscoveryError::NoFeedback {
        command: command.to_string(),
    })?;
    let original_mute = original.mute_on.unwrap_or(false);
    info!(alias = %original_alias, muted = original_mute, "original state");

    if !original_mute {
        info!("muting while sources are cycled");
        conn.process_command("MUTE_TOGGLE", windows.default_window).await?;
    }

    let mut source_map = BTreeMap::new();
    for source in &meta.sources {
        let messages = conn
            .process_command(&source.command_code, windows.default_window)
            .await?;
        let alias = source_alias(&messages, &source.command_code)?;
        info!(source = %source.standard_name, %alias, "discovered alias");
        source_map.insert(alias, source.command_code.clone());
    }

    let restore = source_map
        .get(&original_alias)
        .ok_or_else(|| DiscoveryError::UnknownAlias {
            alias: original_alias.clone(),
        })?
        .clone();
    let messages = conn.process_command(&restore, windows.default_window).await?;
    let final_alias = source_alias(&messages, &restore)?;
    if final_alias != original_alias {
        warn!(
            expected = %original_alias,
            actual = %final_alias,
            "device was not set back to the original source"
        );
    }

    if was_probably_off {
        info!("power was off initially, turning back off");
        conn.process_command("POWER_OFF", windows.window_for("POWER_OFF")).await?;
    } else if !original_mute {
        info!("unmuting");
        conn.process_command("MUTE_TOGGLE", windows.default_window).await?;
    }

    Ok(source_map)
}

fn connection_for(
    options: ConnectOptions,
    meta: Arc<ModelMeta>,
    config: &DiscoveryConfig,
) -> AmpConnection {
    let amp = AmpConnection::new(options, meta);
    match config.open_timeout {
        Some(limit) => amp.with_open_timeout(limit),
        None => amp,
    }
}

/// Open a connection, run [`discover_source_aliases`] on it and close it again.
pub async fn discover_source_aliases_at(
    options: ConnectOptions,
    meta: Arc<ModelMeta>,
    config: &DiscoveryConfig,
) -> Result<BTreeMap<String, String>, DiscoveryError> {
    let mut amp = connection_for(options, meta, config);
    amp.open().await?;
    let shared = SharedConnection::open(amp)?;
    let mut client = shared.new_client().with_windows(config.windows);
    let result = discover_source_aliases(&mut client, config).await;
    drop(client);
    let closed = shared.close().await;
    let source_map = result?;
    closed?;
    Ok(source_map)
}
