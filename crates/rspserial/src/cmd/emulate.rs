use rspserial_emulator::{Emulator, EmulatorConfig};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cmd::{install_ctrlc_handler, parse_duration, EmulateArgs};
use crate::exit::{emulator_error, CliError, CliResult, SUCCESS, USAGE};

pub async fn run(args: EmulateArgs) -> CliResult<i32> {
    let mut config = EmulatorConfig::new(args.model.resolve()?)
        .powered_on(args.on)
        .with_power_on_delay(parse_duration(&args.power_on_delay)?);
    for alias in &args.alias {
        let (source, name) = parse_alias(alias)?;
        config = config.with_alias(source, name);
    }

    let emulator = Emulator::bind(args.bind.as_str(), config)
        .await
        .map_err(|err| emulator_error("emulator failed to start", err))?;
    let addr = emulator
        .local_addr()
        .map_err(|err| emulator_error("emulator failed to start", err))?;
    info!(%addr, "connect with --port socket://{addr}");

    let cancel = CancellationToken::new();
    install_ctrlc_handler(cancel.clone())?;
    emulator
        .run(cancel)
        .await
        .map_err(|err| emulator_error("emulator failed", err))?;
    Ok(SUCCESS)
}

/// Split `SOURCE=ALIAS`. The source may have a leading space (" CD").
fn parse_alias(input: &str) -> CliResult<(&str, &str)> {
    input
        .split_once('=')
        .filter(|(source, _)| !source.is_empty())
        .ok_or_else(|| CliError::new(USAGE, format!("--alias expects SOURCE=ALIAS, got '{input}'")))
}
