use rspserial_conn::{discover_source_aliases_at, CommandWindows, DiscoveryConfig};

use crate::cmd::{parse_duration, DiscoverArgs};
use crate::exit::{discovery_error, CliResult, SUCCESS};
use crate::output::{print_alias_map, OutputFormat};

pub async fn run(args: DiscoverArgs, format: OutputFormat) -> CliResult<i32> {
    let config = config(&args)?;
    let meta = args.conn.model.resolve()?;
    let map = discover_source_aliases_at(args.conn.options()?, meta, &config)
        .await
        .map_err(|err| discovery_error("discovery failed", err))?;
    print_alias_map(&map, format);
    Ok(SUCCESS)
}

fn config(args: &DiscoverArgs) -> CliResult<DiscoveryConfig> {
    Ok(DiscoveryConfig {
        windows: CommandWindows {
            default_window: parse_duration(&args.window)?,
            power_on_window: parse_duration(&args.power_on_window)?,
        },
        open_timeout: Some(parse_duration(&args.conn.connect_timeout)?),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cmd::{ConnArgs, ModelArgs};
    use crate::exit::USAGE;

    fn args(connect_timeout: &str) -> DiscoverArgs {
        DiscoverArgs {
            conn: ConnArgs {
                port: Some("socket://127.0.0.1:50001".into()),
                baud: 19200,
                connect_timeout: connect_timeout.into(),
                model: ModelArgs {
                    model: None,
                    model_file: None,
                },
            },
            window: "200ms".into(),
            power_on_window: "2s".into(),
        }
    }

    #[test]
    fn connect_timeout_applies_to_discovery() {
        let config = config(&args("750ms")).unwrap();
        assert_eq!(config.open_timeout, Some(Duration::from_millis(750)));
        assert_eq!(config.windows.default_window, Duration::from_millis(200));
        assert_eq!(config.windows.power_on_window, Duration::from_secs(2));
    }

    #[test]
    fn bad_connect_timeout_is_a_usage_error() {
        assert_eq!(config(&args("soon")).unwrap_err().code, USAGE);
    }
}
