use rspserial_message::MessageCodec;

use crate::cmd::{parse_duration, VolumeArgs};
use crate::exit::{conn_error, message_error, CliResult, SUCCESS};
use crate::output::{print_messages, OutputFormat};

pub async fn run(args: VolumeArgs, format: OutputFormat) -> CliResult<i32> {
    let window = parse_duration(&args.window)?;
    // Reject bad zone or level before touching the port.
    MessageCodec::new(args.conn.model.resolve()?)
        .volume_direct_payload(args.zone, args.level)
        .map_err(|err| message_error("invalid volume", err))?;

    let (shared, mut client) = args.conn.open().await?;
    let sent = client
        .send_volume_direct_command(args.zone, args.level)
        .await;
    let messages = if sent.is_ok() {
        client.collect(window).await
    } else {
        Vec::new()
    };
    let codec = client.codec().clone();
    drop(client);
    shared
        .close()
        .await
        .map_err(|err| conn_error("close failed", err))?;

    sent.map_err(|err| conn_error("send failed", err))?;
    print_messages(&messages, &codec, format);
    Ok(SUCCESS)
}
