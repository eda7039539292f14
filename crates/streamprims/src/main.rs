mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "streamprims", version, about = "Binary stream inspection CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "STREAMPRIMS_LOG",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{Endian, Width};

    #[test]
    fn parses_dump_subcommand() {
        let cli = Cli::try_parse_from([
            "streamprims",
            "dump",
            "/tmp/data.bin",
            "--width",
            "16",
            "--endian",
            "be",
            "--signed",
            "--offset",
            "2",
            "--count",
            "4",
        ])
        .expect("dump args should parse");

        let Command::Dump(args) = cli.command else {
            panic!("expected dump");
        };
        assert_eq!(args.width, Width::W16);
        assert_eq!(args.endian, Endian::Be);
        assert!(args.signed);
        assert_eq!(args.offset, 2);
        assert_eq!(args.count, Some(4));
    }

    #[test]
    fn rejects_unsupported_width() {
        let err = Cli::try_parse_from(["streamprims", "dump", "/tmp/x", "--width", "24"])
            .expect_err("width 24 should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_copy_with_chunk_size() {
        let cli = Cli::try_parse_from([
            "streamprims",
            "--format",
            "json",
            "copy",
            "/tmp/a",
            "/tmp/b",
            "--chunk-size",
            "64",
        ])
        .expect("copy args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        let Command::Copy(args) = cli.command else {
            panic!("expected copy");
        };
        assert_eq!(args.chunk_size, 64);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["streamprims", "info", "/tmp/x", "--log-format", "json"])
            .expect("global flag after subcommand should parse");
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert!(matches!(cli.command, Command::Info(_)));
    }
}
