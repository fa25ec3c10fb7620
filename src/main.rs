use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

use commands::check;
use sbomcheck::defaults::load_defaults;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "sbomcheck")]
#[command(version = VERSION)]
#[command(about = "Check SPDX SBOMs against the NTIA and FSCT v3 minimum elements")]
struct Cli {
    #[command(flatten)]
    check: check::CheckArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if cli.check.file().is_none() {
        let _ = Cli::command().print_help();
        println!();
        return std::process::ExitCode::SUCCESS;
    }

    init_tracing(cli.check.verbose);
    let defaults = load_defaults();
    let format = cli.check.output_format(&defaults);

    let exit_code = match check::run(cli.check, &defaults) {
        Ok((rendered, exit_code)) => match output::emit(rendered) {
            Ok(()) => exit_code,
            Err(err) => output::print_error(&err, format),
        },
        Err(err) => output::print_error(&err, format),
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// `--verbose` forces debug; otherwise `RUST_LOG` applies, defaulting to info.
fn log_filter(verbose: bool) -> EnvFilter {
    let fallback = || EnvFilter::default().add_directive(default_level(verbose).into());
    if verbose {
        return fallback();
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(default_level(true), LevelFilter::DEBUG);
        assert_eq!(default_level(false), LevelFilter::INFO);
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn exit_codes_clamp_to_u8() {
        assert_eq!(exit_code_to_u8(-1), 0);
        assert_eq!(exit_code_to_u8(1), 1);
        assert_eq!(exit_code_to_u8(300), 255);
    }
}
