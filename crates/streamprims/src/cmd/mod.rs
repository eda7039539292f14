use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use streamprims_codec::DEFAULT_LOAD_CHUNK_SIZE;
use streamprims_io::IoStream;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod cat;
pub mod copy;
pub mod dump;
pub mod info;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show backend properties and size of a file stream.
    Info(InfoArgs),
    /// Load a whole file and write its bytes to stdout.
    Cat(CatArgs),
    /// Load one file and save it to another.
    Copy(CopyArgs),
    /// Decode consecutive fixed-width integers.
    Dump(DumpArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Info(args) => info::run(args, format),
        Command::Cat(args) => cat::run(args),
        Command::Copy(args) => copy::run(args, format),
        Command::Dump(args) => dump::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// File or FIFO to open.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// File or FIFO to read.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source file.
    pub src: PathBuf,
    /// Destination file (created or truncated).
    pub dst: PathBuf,
    /// Growth step when the source size is unknown.
    #[arg(long, default_value_t = DEFAULT_LOAD_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Width {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    pub fn bytes(self) -> u64 {
        u64::from(self.bits() / 8)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Endian {
    Le,
    Be,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// File or FIFO to decode.
    pub path: PathBuf,
    /// Integer width in bits.
    #[arg(long, default_value = "8")]
    pub width: Width,
    /// Byte order.
    #[arg(long, default_value = "le")]
    pub endian: Endian,
    /// Decode as two's-complement signed values.
    #[arg(long)]
    pub signed: bool,
    /// Byte offset to start from.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
    /// Stop after N values. Default: until end of stream.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(unix)]
pub(crate) fn open_stream(path: &Path, mode: &str) -> CliResult<IoStream<'static>> {
    IoStream::from_file(path, mode)
        .map_err(|err| crate::exit::stream_error(&format!("open {}", path.display()), err))
}

#[cfg(not(unix))]
pub(crate) fn open_stream(path: &Path, _mode: &str) -> CliResult<IoStream<'static>> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!(
            "open {}: file streams are only available on Unix",
            path.display()
        ),
    ))
}
