mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fifolink", version, about = "FIFO device link CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "fifolink",
            "encode",
            "--width",
            "2",
            "258",
            "0x0102",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => assert_eq!(args.values, vec![258, 0x0102]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_device_with_loopback() {
        let err = Cli::try_parse_from([
            "fifolink",
            "exchange",
            "--device",
            "/dev/ttyUSB0",
            "--loopback",
            "--ramp",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn exchange_requires_a_payload_source() {
        let err = Cli::try_parse_from(["fifolink", "exchange", "--loopback"])
            .expect_err("missing payload should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_monitor_subcommand() {
        let cli = Cli::try_parse_from([
            "fifolink",
            "monitor",
            "/dev/ttyUSB0",
            "--count",
            "3",
            "--width-rx",
            "2",
        ])
        .expect("monitor args should parse");
        assert!(matches!(cli.command, Command::Monitor(_)));
    }

    #[test]
    fn monitor_idle_flags_default_and_override() {
        let cli = Cli::try_parse_from(["fifolink", "monitor", "/dev/ttyUSB0"])
            .expect("monitor args should parse");
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor");
        };
        assert_eq!(args.device, std::path::PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(args.max_idle, 10);
        assert_eq!(args.idle_backoff_ms, 50);

        let cli = Cli::try_parse_from([
            "fifolink",
            "monitor",
            "/dev/ttyUSB0",
            "--max-idle",
            "0",
            "--idle-backoff-ms",
            "5",
        ])
        .expect("monitor args should parse");
        let Command::Monitor(args) = cli.command else {
            panic!("expected monitor");
        };
        assert_eq!(args.max_idle, 0);
        assert_eq!(args.idle_backoff_ms, 5);
    }
}
