use rspserial_frame::hex;
use rspserial_message::MessageCodec;

use crate::cmd::EncodeArgs;
use crate::exit::{message_error, CliResult, SUCCESS};
use crate::output::{print_encoded, EncodedCommand, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let codec = MessageCodec::new(args.model.resolve()?);
    let names: Vec<String> = match &args.command {
        Some(name) => vec![name.clone()],
        None => codec
            .meta()
            .commands
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
    };

    let mut encoded = Vec::with_capacity(names.len());
    for name in names {
        encoded.push(encode_one(&codec, name)?);
    }
    print_encoded(&encoded, format);
    Ok(SUCCESS)
}

fn encode_one(codec: &MessageCodec, name: String) -> CliResult<EncodedCommand> {
    let payload = codec
        .command_payload(&name)
        .map_err(|err| message_error("encode failed", err))?;
    let frame = codec
        .encode_command(&name)
        .map_err(|err| message_error("encode failed", err))?;
    Ok(EncodedCommand {
        name,
        message_type: payload[1],
        key: payload[2],
        frame: hex(&frame),
    })
}

#[cfg(test)]
mod tests {
    use rspserial_message::ModelMeta;

    use super::*;

    #[test]
    fn encodes_power_on() {
        let codec = MessageCodec::new(ModelMeta::rsp1570());
        let out = encode_one(&codec, "POWER_ON".into()).unwrap();
        assert_eq!(out.message_type, 0x10);
        assert_eq!(out.key, 0x4B);
        assert_eq!(out.frame, "FE 03 A3 10 4B 01");
    }

    #[test]
    fn unknown_command_is_usage_error() {
        let codec = MessageCodec::new(ModelMeta::rsp1570());
        let err = encode_one(&codec, "NOT_A_COMMAND".into()).err().unwrap();
        assert_eq!(err.code, crate::exit::USAGE);
    }
}
