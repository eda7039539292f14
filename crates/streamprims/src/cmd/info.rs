use serde::Serialize;
use tracing::debug;

use crate::cmd::{open_stream, InfoArgs};
use crate::exit::{stream_error, CliResult, SUCCESS};
use crate::output::{optional, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct InfoOutput {
    schema_id: &'static str,
    path: String,
    kind: &'static str,
    size: Option<u64>,
    fd: Option<i32>,
    regular_file: Option<bool>,
    autoclose: Option<bool>,
}

impl Report for InfoOutput {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("path", self.path.clone()),
            ("kind", self.kind.to_string()),
            ("size", optional(self.size)),
            ("fd", optional(self.fd)),
            ("regular_file", optional(self.regular_file)),
            ("autoclose", optional(self.autoclose)),
        ]
    }
}

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let mut stream = open_stream(&args.path, "rb")?;
    let props = stream.properties();

    // Pipes have no size; report that rather than failing.
    let size = match stream.size() {
        Ok(size) => Some(size),
        Err(err) => {
            debug!(%err, path = %args.path.display(), "size unavailable");
            None
        }
    };

    stream
        .close()
        .map_err(|err| stream_error(&format!("close {}", args.path.display()), err))?;

    let out = InfoOutput {
        schema_id: "https://schemas.3leaps.dev/streamprims/cli/v1/stream-info.schema.json",
        path: args.path.display().to_string(),
        kind: props.kind,
        size,
        fd: props.fd,
        regular_file: props.regular_file,
        autoclose: props.autoclose,
    };
    print_report(&out, format);
    Ok(SUCCESS)
}
