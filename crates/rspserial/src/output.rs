use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rspserial_frame::hex;
use rspserial_message::{DisplayState, Message, MessageCodec, MessageKind, TriggerGroup};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput {
    kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icons: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<DisplayState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    triggers: Option<Vec<TriggerGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<u8>,
    timestamp: String,
}

impl MessageOutput {
    fn new(message: &Message, codec: &MessageCodec) -> Self {
        let mut out = Self {
            kind: message.kind(),
            lines: None,
            icons: None,
            display: None,
            triggers: None,
            command: None,
            message_type: None,
            key: None,
            start: None,
            timestamp: now_unix_seconds(),
        };
        match message {
            Message::Feedback(feedback) => {
                out.lines = Some(feedback.lines.to_vec());
                out.icons = Some(feedback.icons_that_are_on());
                out.display = Some(feedback.parse_display_lines());
            }
            Message::Trigger(trigger) => out.triggers = Some(trigger.flags_to_list()),
            Message::Command(command) => {
                out.command = command
                    .key
                    .first()
                    .and_then(|&key| codec.command_name(command.message_type, key))
                    .map(str::to_string);
                out.message_type = Some(command.message_type);
                out.key = Some(hex(&command.key));
            }
            Message::SmartDisplay(display) => {
                out.lines = Some(display.lines.clone());
                out.start = Some(display.start);
            }
        }
        out
    }

    /// One-line human summary.
    fn summary(&self) -> String {
        match (&self.lines, &self.triggers, &self.command, &self.key) {
            (Some(lines), _, _, _) => lines
                .iter()
                .map(|line| format!("'{}'", line.replace('\0', " ")))
                .collect::<Vec<_>>()
                .join(" / "),
            (_, Some(groups), _, _) => groups
                .iter()
                .map(|group| {
                    let on: Vec<String> = group
                        .triggers
                        .iter()
                        .enumerate()
                        .filter(|(_, on)| **on)
                        .map(|(i, _)| (i + 1).to_string())
                        .collect();
                    format!("{}: [{}]", group.name, on.join(" "))
                })
                .collect::<Vec<_>>()
                .join(", "),
            (_, _, Some(name), _) => name.clone(),
            (_, _, None, Some(key)) => format!("{:#04X} {key}", self.message_type.unwrap_or(0)),
            _ => String::new(),
        }
    }
}

pub fn print_messages(messages: &[Message], codec: &MessageCodec, format: OutputFormat) {
    let outputs: Vec<MessageOutput> = messages
        .iter()
        .map(|message| MessageOutput::new(message, codec))
        .collect();
    match format {
        OutputFormat::Json => {
            for out in &outputs {
                print_json(out);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["KIND", "CONTENT", "ICONS"]);
            for out in &outputs {
                table.add_row(vec![
                    out.kind.to_string(),
                    out.summary(),
                    out.icons.as_ref().map(|i| i.join(" ")).unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for out in &outputs {
                println!("{}: {}", out.kind, out.summary());
                if let Some(icons) = &out.icons {
                    println!("  icons: {}", icons.join(" "));
                }
            }
        }
        OutputFormat::Raw => {
            for out in &outputs {
                print_raw(format!("{}\n", out.summary()).as_bytes());
            }
        }
    }
}

pub fn print_message(message: &Message, codec: &MessageCodec, format: OutputFormat) {
    print_messages(std::slice::from_ref(message), codec, format);
}

pub fn print_alias_map(map: &BTreeMap<String, String>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(map),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ALIAS", "COMMAND"]);
            for (alias, command) in map {
                table.add_row(vec![alias.clone(), command.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for (alias, command) in map {
                println!("{:<16} {command}", format!("'{alias}'"));
            }
        }
    }
}

#[derive(Serialize)]
pub struct EncodedCommand {
    pub name: String,
    pub message_type: u8,
    pub key: u8,
    pub frame: String,
}

pub fn print_encoded(commands: &[EncodedCommand], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for command in commands {
                print_json(command);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["COMMAND", "TYPE", "KEY", "FRAME"]);
            for command in commands {
                table.add_row(vec![
                    command.name.clone(),
                    format!("{:02X}", command.message_type),
                    format!("{:02X}", command.key),
                    command.frame.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for command in commands {
                println!("{:<32} {}", command.name, command.frame);
            }
        }
        OutputFormat::Raw => {
            for command in commands {
                println!("{}", command.frame);
            }
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use rspserial_message::{CommandMessage, FeedbackMessage, ModelMeta, TriggerMessage};

    use super::*;

    fn codec() -> MessageCodec {
        MessageCodec::new(ModelMeta::rsp1570())
    }

    #[test]
    fn feedback_summary_and_json() {
        let message = Message::Feedback(FeedbackMessage::new(
            "FIRE TV   pty VOL  64",
            "DOLBY PL\x19 M     48K  ",
            [0x00, 0x46, 0x08, 0x00, 0xFC],
        ));
        let out = MessageOutput::new(&message, &codec());
        assert_eq!(
            out.summary(),
            "'FIRE TV   pty VOL  64' / 'DOLBY PL\x19 M     48K  '"
        );
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["kind"], "feedback");
        assert_eq!(json["display"]["volume"], 64);
        assert_eq!(json["display"]["party_mode_on"], true);
        assert!(json.get("command").is_none());
    }

    #[test]
    fn command_is_named() {
        let message = Message::Command(CommandMessage::new(0x10, vec![0x0B]));
        let out = MessageOutput::new(&message, &codec());
        assert_eq!(out.summary(), "VOLUME_UP");
        assert_eq!(out.key.as_deref(), Some("0B"));
    }

    #[test]
    fn trigger_summary_lists_active_triggers() {
        let message = Message::Trigger(TriggerMessage {
            flags: [0x03, 0x01, 0x00, 0x00, 0x20],
        });
        let out = MessageOutput::new(&message, &codec());
        assert_eq!(
            out.summary(),
            "All: [1 2], Main: [1], Zone 2: [], Zone 3: [], Zone 4: [6]"
        );
    }
}
