use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use rspserial_conn::{AmpConnection, ClientConnection, SharedConnection};
use rspserial_message::ModelMeta;
use rspserial_transport::{default_serial_port, ConnectOptions, Endpoint, DEFAULT_BAUD_RATE};
use tokio_util::sync::CancellationToken;

use crate::exit::{
    conn_error, io_error, message_error, transport_error, CliError, CliResult, INTERNAL, USAGE,
};
use crate::output::OutputFormat;

pub mod discover;
pub mod emulate;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;
pub mod volume;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a command and print the messages received in its window.
    Send(SendArgs),
    /// Set a zone's volume directly.
    Volume(VolumeArgs),
    /// Print decoded messages until interrupted.
    Listen(ListenArgs),
    /// Learn the names the device shows for its sources.
    Discover(DiscoverArgs),
    /// Print the wire bytes of one command or the whole command table.
    Encode(EncodeArgs),
    /// Run a device emulator on TCP.
    Emulate(EmulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => block_on(send::run(args, format)),
        Command::Volume(args) => block_on(volume::run(args, format)),
        Command::Listen(args) => block_on(listen::run(args, format)),
        Command::Discover(args) => block_on(discover::run(args, format)),
        Command::Encode(args) => encode::run(args, format),
        Command::Emulate(args) => block_on(emulate::run(args)),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Built-in model (rsp1570, rsp1572). Default: rsp1570.
    #[arg(long, conflicts_with = "model_file")]
    pub model: Option<String>,
    /// Load the model from a JSON file instead.
    #[arg(long, value_name = "PATH")]
    pub model_file: Option<PathBuf>,
}

impl ModelArgs {
    pub fn resolve(&self) -> CliResult<Arc<ModelMeta>> {
        if let Some(path) = &self.model_file {
            return ModelMeta::load(path)
                .map(Arc::new)
                .map_err(|err| message_error(&format!("failed loading {}", path.display()), err));
        }
        let name = self.model.as_deref().unwrap_or("rsp1570");
        ModelMeta::by_name(name).ok_or_else(|| {
            CliError::new(
                USAGE,
                format!(
                    "unknown model '{name}', expected one of: {}",
                    ModelMeta::names().join(", ")
                ),
            )
        })
    }
}

#[derive(Args, Debug)]
pub struct ConnArgs {
    /// Serial device or socket://host:port. Default: the platform serial port.
    #[arg(long, short = 'p', env = "RSPSERIAL_PORT")]
    pub port: Option<String>,
    /// Serial line speed.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Give up connecting after this long (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub connect_timeout: String,
    #[command(flatten)]
    pub model: ModelArgs,
}

impl ConnArgs {
    pub fn options(&self) -> CliResult<ConnectOptions> {
        let port = match &self.port {
            Some(port) => port.as_str(),
            None => default_serial_port().ok_or_else(|| {
                CliError::new(USAGE, "no default serial port on this platform, pass --port")
            })?,
        };
        let endpoint = Endpoint::parse(port).map_err(|err| transport_error("bad --port", err))?;
        let mut options = ConnectOptions::new(endpoint);
        options.baud_rate = self.baud;
        Ok(options)
    }

    /// Open the link and attach one client to it.
    pub async fn open(&self) -> CliResult<(SharedConnection, ClientConnection)> {
        let meta = self.model.resolve()?;
        let timeout = parse_duration(&self.connect_timeout)?;
        let mut conn = AmpConnection::new(self.options()?, meta).with_open_timeout(timeout);
        conn.open()
            .await
            .map_err(|err| conn_error("connect failed", err))?;
        let shared =
            SharedConnection::open(conn).map_err(|err| conn_error("connect failed", err))?;
        let client = shared.new_client();
        Ok((shared, client))
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Command name, e.g. POWER_ON or SOURCE_CD.
    pub command: String,
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Collection window (e.g. 1s, 500ms). Default: 5s for power commands, 1s otherwise.
    #[arg(long)]
    pub window: Option<String>,
}

#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// Zone 1 (main) to 4.
    pub zone: u8,
    /// Volume level.
    pub level: i32,
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Collection window (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub window: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub conn: ConnArgs,
    /// Window for each command (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub window: String,
    /// Window for powering on.
    #[arg(long, default_value = "5s")]
    pub power_on_window: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command name. Default: every command of the model.
    pub command: Option<String>,
    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug)]
pub struct EmulateArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:50001")]
    pub bind: String,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Start powered on.
    #[arg(long)]
    pub on: bool,
    /// Display name for a source, as SOURCE=ALIAS (repeatable).
    #[arg(long, value_name = "SOURCE=ALIAS")]
    pub alias: Vec<String>,
    /// Boot time after power on (e.g. 1500ms).
    #[arg(long, default_value = "1500ms")]
    pub power_on_delay: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn block_on<F>(future: F) -> CliResult<i32>
where
    F: std::future::Future<Output = CliResult<i32>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("runtime setup failed", err))?;
    runtime.block_on(future)
}

/// Cancel `cancel` on Ctrl-C.
pub fn install_ctrlc_handler(cancel: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || cancel.cancel()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn model_resolution() {
        let args = ModelArgs {
            model: Some("RSP1572".into()),
            model_file: None,
        };
        assert_eq!(args.resolve().unwrap().device_id, 0xA5);

        let args = ModelArgs {
            model: Some("rsp9999".into()),
            model_file: None,
        };
        assert_eq!(args.resolve().unwrap_err().code, USAGE);
    }

    #[test]
    fn port_is_parsed_into_options() {
        let args = ConnArgs {
            port: Some("socket://127.0.0.1:50001".into()),
            baud: 9600,
            connect_timeout: "1s".into(),
            model: ModelArgs {
                model: None,
                model_file: None,
            },
        };
        let options = args.options().unwrap();
        assert!(options.endpoint.is_tcp());
        assert_eq!(options.baud_rate, 9600);
    }
}
