use streamprims_codec::DEFAULT_LOAD_CHUNK_SIZE;
use streamprims_io::DEFAULT_CHUNK_SIZE;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("streamprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: streamprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("STREAMPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("STREAMPRIMS_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "backends: fd={}, stdio={}, memory=true, dynamic-memory=true",
        cfg!(unix),
        cfg!(unix)
    );
    println!("dynamic_chunk_size: {DEFAULT_CHUNK_SIZE}");
    println!("load_chunk_size: {DEFAULT_LOAD_CHUNK_SIZE}");

    Ok(SUCCESS)
}
