use tracing::info;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{conn_error, CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub async fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let window = args.window.as_deref().map(parse_duration).transpose()?;
    let (shared, mut client) = args.conn.open().await?;

    let result = match window {
        Some(window) => client.process_command(&args.command, window).await,
        None => client.process_command_auto(&args.command).await,
    };
    let codec = client.codec().clone();
    drop(client);
    shared
        .close()
        .await
        .map_err(|err| conn_error("close failed", err))?;

    let messages = result.map_err(|err| conn_error("send failed", err))?;
    info!(command = %args.command, count = messages.len(), "command processed");
    print_messages(&messages, &codec, format);
    Ok(SUCCESS)
}
