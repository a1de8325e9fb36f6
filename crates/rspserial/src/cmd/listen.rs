use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cmd::{install_ctrlc_handler, ListenArgs};
use crate::exit::{conn_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub async fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let cancel = CancellationToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let (shared, mut client) = args.conn.open().await?;
    let codec = client.codec().clone();
    let mut printed = 0usize;

    loop {
        let item = tokio::select! {
            _ = cancel.cancelled() => break,
            item = client.recv() => item,
        };
        match item {
            Some(Ok(message)) => {
                print_message(&message, &codec, format);
                printed = printed.saturating_add(1);
                if args.count.is_some_and(|count| printed >= count) {
                    break;
                }
            }
            Some(Err(err)) => warn!(%err, "undecodable message"),
            None => {
                info!("connection closed by peer");
                break;
            }
        }
    }

    drop(client);
    shared
        .close()
        .await
        .map_err(|err| conn_error("close failed", err))?;
    Ok(SUCCESS)
}
