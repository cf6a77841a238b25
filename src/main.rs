use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use jes_assess::application::error_chain;
use jes_assess::cli::commands::execute_command;
use jes_assess::cli::{output, Cli};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = execute_command(&cli) {
        output::error(&error_chain(&e));
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v when set
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Create a noisy module filter
    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .with_thread_names(false)
        .with_span_events(if verbosity > 1 {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    let filtered_layer = fmt_layer.with_filter(env_filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match level {
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_positionals_when_parsing_then_fills_in_order() {
        let cli = Cli::try_parse_from([
            "assess-jes-deploy",
            "lxd",
            "/usr/bin/juju",
            "/tmp/logs",
            "ctrl",
            "--series",
            "bionic",
            "-vv",
            "--machine",
            "10.0.0.2",
            "--machine",
            "10.0.0.3",
            "--timeout",
            "3600",
        ])
        .unwrap();

        assert_eq!(cli.env, "lxd");
        assert_eq!(cli.juju_bin, "/usr/bin/juju");
        assert_eq!(cli.logs.as_deref(), Some(std::path::Path::new("/tmp/logs")));
        assert_eq!(cli.temp_env_name.as_deref(), Some("ctrl"));
        assert_eq!(cli.series.as_deref(), Some("bionic"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.machines, vec!["10.0.0.2", "10.0.0.3"]);
        assert_eq!(cli.deadline, Some(3600));
    }

    #[test]
    fn given_only_env_when_parsing_then_defaults_apply() {
        let cli = Cli::try_parse_from(["assess-jes-deploy", "lxd"]).unwrap();
        assert_eq!(cli.juju_bin, "juju");
        assert!(cli.logs.is_none());
        assert!(cli.temp_env_name.is_none());
        assert!(!cli.keep_env);
        assert!(cli.deadline.is_none());
    }
}
