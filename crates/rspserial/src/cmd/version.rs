use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("rspserial {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: rspserial");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("RSPSERIAL_BUILD_TARGET").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "models: {}",
        rspserial_message::ModelMeta::names().join(", ")
    );
    println!(
        "default_port: {}",
        rspserial_transport::default_serial_port().unwrap_or("none")
    );

    Ok(SUCCESS)
}
