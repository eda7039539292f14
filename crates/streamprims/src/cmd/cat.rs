use streamprims_codec::load_all_then_close;
use streamprims_io::Status;

use crate::cmd::{open_stream, CatArgs};
use crate::exit::{bulk_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::print_raw;

pub fn run(args: CatArgs) -> CliResult<i32> {
    let stream = open_stream(&args.path, "rb")?;
    let loaded = load_all_then_close(stream)
        .map_err(|err| bulk_error(&format!("load {}", args.path.display()), err))?;

    print_raw(loaded.as_bytes());

    if loaded.status() == Status::Error {
        return Err(CliError::new(
            FAILURE,
            format!(
                "read {}: stopped after {} bytes",
                args.path.display(),
                loaded.len()
            ),
        ));
    }
    Ok(SUCCESS)
}
