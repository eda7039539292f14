use serde::Serialize;
use streamprims_codec::{load_all_with_config, save_all_with_config, BulkConfig};
use streamprims_io::Status;
use tracing::{info, warn};

use crate::cmd::{open_stream, CopyArgs};
use crate::exit::{bulk_error, stream_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct CopyOutput {
    schema_id: &'static str,
    source: String,
    destination: String,
    bytes: usize,
    chunk_size: usize,
}

impl Report for CopyOutput {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("source", self.source.clone()),
            ("destination", self.destination.clone()),
            ("bytes", self.bytes.to_string()),
            ("chunk_size", self.chunk_size.to_string()),
        ]
    }
}

pub fn run(args: CopyArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk_size == 0 {
        return Err(CliError::new(USAGE, "--chunk-size must be greater than zero"));
    }
    let config = BulkConfig {
        chunk_size: args.chunk_size,
        ..BulkConfig::default()
    };

    let mut src = open_stream(&args.src, "rb")?;
    let loaded = load_all_with_config(&mut src, &config);
    if let Err(err) = src.close() {
        warn!(%err, path = %args.src.display(), "failed to close source");
    }
    let loaded = loaded.map_err(|err| bulk_error(&format!("load {}", args.src.display()), err))?;
    if loaded.status() == Status::Error {
        return Err(CliError::new(
            FAILURE,
            format!(
                "read {}: stopped after {} bytes",
                args.src.display(),
                loaded.len()
            ),
        ));
    }

    let mut dst = open_stream(&args.dst, "wb")?;
    save_all_with_config(&mut dst, loaded.as_bytes(), &config)
        .map_err(|err| bulk_error(&format!("save {}", args.dst.display()), err))?;
    // Data sync is only meaningful for regular files; closing flushes pipes.
    if dst.properties().regular_file == Some(true) {
        dst.flush()
            .map_err(|err| stream_error(&format!("flush {}", args.dst.display()), err))?;
    }
    dst.close()
        .map_err(|err| stream_error(&format!("close {}", args.dst.display()), err))?;

    info!(
        bytes = loaded.len(),
        src = %args.src.display(),
        dst = %args.dst.display(),
        "copy complete"
    );

    let out = CopyOutput {
        schema_id: "https://schemas.3leaps.dev/streamprims/cli/v1/copy-result.schema.json",
        source: args.src.display().to_string(),
        destination: args.dst.display().to_string(),
        bytes: loaded.len(),
        chunk_size: config.chunk_size,
    };
    print_report(&out, format);
    Ok(SUCCESS)
}
