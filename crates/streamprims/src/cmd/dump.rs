use serde::Serialize;
use streamprims_codec::EndianExt;
use streamprims_io::{IoStream, Status, Whence};

use crate::cmd::{open_stream, DumpArgs, Endian, Width};
use crate::exit::{stream_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
enum Value {
    Unsigned(u64),
    Signed(i64),
}

impl Value {
    fn hex(self, width: Width) -> String {
        let digits = (width.bits() / 4) as usize;
        let bits = match self {
            Value::Unsigned(v) => v,
            Value::Signed(v) => (v as u64) & mask(width),
        };
        format!("0x{bits:0digits$x}")
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Signed(v) => write!(f, "{v}"),
        }
    }
}

fn mask(width: Width) -> u64 {
    match width {
        Width::W64 => u64::MAX,
        other => (1u64 << other.bits()) - 1,
    }
}

#[derive(Serialize)]
struct DumpEntry {
    offset: u64,
    value: Value,
}

#[derive(Serialize)]
struct DumpOutput {
    schema_id: &'static str,
    path: String,
    width: u32,
    endian: &'static str,
    signed: bool,
    values: Vec<DumpEntry>,
}

/// Decode one value of the requested shape, or `None` on a short read.
fn read_value(
    stream: &mut IoStream<'_>,
    width: Width,
    endian: Endian,
    signed: bool,
) -> Option<Value> {
    use Endian::{Be, Le};
    use Width::{W16, W32, W64, W8};

    let value = match (width, endian, signed) {
        (W8, _, false) => Value::Unsigned(stream.read_u8()?.into()),
        (W8, _, true) => Value::Signed(stream.read_s8()?.into()),
        (W16, Le, false) => Value::Unsigned(stream.read_u16_le()?.into()),
        (W16, Le, true) => Value::Signed(stream.read_s16_le()?.into()),
        (W16, Be, false) => Value::Unsigned(stream.read_u16_be()?.into()),
        (W16, Be, true) => Value::Signed(stream.read_s16_be()?.into()),
        (W32, Le, false) => Value::Unsigned(stream.read_u32_le()?.into()),
        (W32, Le, true) => Value::Signed(stream.read_s32_le()?.into()),
        (W32, Be, false) => Value::Unsigned(stream.read_u32_be()?.into()),
        (W32, Be, true) => Value::Signed(stream.read_s32_be()?.into()),
        (W64, Le, false) => Value::Unsigned(stream.read_u64_le()?),
        (W64, Le, true) => Value::Signed(stream.read_s64_le()?),
        (W64, Be, false) => Value::Unsigned(stream.read_u64_be()?),
        (W64, Be, true) => Value::Signed(stream.read_s64_be()?),
    };
    Some(value)
}

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let context = format!("dump {}", args.path.display());
    let mut stream = open_stream(&args.path, "rb")?;

    if args.offset > 0 {
        let offset = i64::try_from(args.offset)
            .map_err(|_| CliError::new(USAGE, format!("{context}: offset too large")))?;
        stream
            .seek(offset, Whence::Set)
            .map_err(|err| stream_error(&context, err))?;
    }

    let mut values = Vec::new();
    let mut offset = args.offset;
    while args.count.is_none_or(|count| (values.len() as u64) < count) {
        let Some(value) = read_value(&mut stream, args.width, args.endian, args.signed) else {
            break;
        };
        values.push(DumpEntry { offset, value });
        offset += args.width.bytes();
    }

    let status = stream.status();
    let failure = stream.take_error();
    stream.close().map_err(|err| stream_error(&context, err))?;
    if status == Status::Error {
        let message = failure.map_or_else(|| "read failed".to_string(), |err| err.to_string());
        return Err(CliError::new(FAILURE, format!("{context}: {message}")));
    }

    let out = DumpOutput {
        schema_id: "https://schemas.3leaps.dev/streamprims/cli/v1/dump.schema.json",
        path: args.path.display().to_string(),
        width: args.width.bits(),
        endian: match args.endian {
            Endian::Le => "le",
            Endian::Be => "be",
        },
        signed: args.signed,
        values,
    };
    print_dump(&out, args.width, format);
    Ok(SUCCESS)
}

fn print_dump(out: &DumpOutput, width: Width, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["OFFSET", "VALUE", "HEX"]);
            for entry in &out.values {
                table.add_row(vec![
                    entry.offset.to_string(),
                    entry.value.to_string(),
                    entry.value.hex(width),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in &out.values {
                println!(
                    "{:>10}  {:>20}  {}",
                    entry.offset,
                    entry.value,
                    entry.value.hex(width)
                );
            }
        }
        OutputFormat::Raw => {
            for entry in &out.values {
                println!("{}", entry.value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_shape_from_memory() {
        let data = [0xFF, 0xFE, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut stream = IoStream::from_const_mem(&data).unwrap();

        assert_eq!(
            read_value(&mut stream, Width::W8, Endian::Le, true),
            Some(Value::Signed(-1))
        );
        assert_eq!(
            read_value(&mut stream, Width::W8, Endian::Be, false),
            Some(Value::Unsigned(0xFE))
        );
        assert_eq!(
            read_value(&mut stream, Width::W16, Endian::Be, false),
            Some(Value::Unsigned(0x0102))
        );
        assert_eq!(
            read_value(&mut stream, Width::W32, Endian::Le, false),
            Some(Value::Unsigned(0x0605_0403))
        );
        assert_eq!(read_value(&mut stream, Width::W8, Endian::Le, false), None);
        assert_eq!(stream.status(), Status::Eof);
    }

    #[test]
    fn short_trailing_value_is_dropped() {
        let data = [0u8; 6];
        let mut stream = IoStream::from_const_mem(&data).unwrap();
        assert!(read_value(&mut stream, Width::W32, Endian::Le, false).is_some());
        assert!(read_value(&mut stream, Width::W32, Endian::Le, false).is_none());
    }

    #[test]
    fn hex_masks_signed_values_to_width() {
        assert_eq!(Value::Signed(-1).hex(Width::W16), "0xffff");
        assert_eq!(Value::Signed(-2).hex(Width::W64), "0xfffffffffffffffe");
        assert_eq!(Value::Unsigned(10).hex(Width::W8), "0x0a");
    }

    #[test]
    fn signed_and_unsigned_serialize_as_plain_numbers() {
        let entries = vec![
            DumpEntry {
                offset: 0,
                value: Value::Signed(-5),
            },
            DumpEntry {
                offset: 2,
                value: Value::Unsigned(u64::MAX),
            },
        ];
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(
            json,
            r#"[{"offset":0,"value":-5},{"offset":2,"value":18446744073709551615}]"#
        );
    }
}
