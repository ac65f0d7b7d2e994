//! Icinga/Nagios check for A10 load balancer memory usage.

use std::process::ExitCode;

use a10_monitoring_cli::format::{error_chain, pretty_size, write_stdout};
use a10_monitoring_cli::health::{CheckResult, Status};
use a10_monitoring_cli::{AppError, logging, options};
use a10_monitoring_client::{A10LoadBalancer, A10RestApi, ClientConfig};
use a10_monitoring_core::{CommandLine, OptionSpec, ParseOutcome};
use tracing::debug;

const DESCRIPTION: &str = "
Check A10 load balancer memory usage. Returns:

CRITICAL if % usage > critical-threshold
WARNING  if % usage > warning-threshold
OK       otherwise
";

const EXAMPLES: &str = "__APPNAME__ [options]";

const WARNING_THRESHOLD: &str = "warning_threshold";
const CRITICAL_THRESHOLD: &str = "critical_threshold";

enum Outcome {
    Stopped(String),
    Checked(CheckResult),
}

fn main() -> ExitCode {
    let mut cli = CommandLine::from_env()
        .with_description(DESCRIPTION)
        .with_examples(EXAMPLES);

    match declare(&mut cli).and_then(|()| check(&mut cli)) {
        Ok(Outcome::Stopped(text)) => match write_stdout(&text) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => CheckResult::new(Status::Unknown, AppError::from(err).to_string()).report(),
        },
        Ok(Outcome::Checked(result)) => result.report(),
        Err(err) => {
            if cli.flag(options::VERBOSE).unwrap_or(false) {
                eprintln!("{}", error_chain(&err));
            }
            CheckResult::new(Status::Critical, err.to_string()).report()
        }
    }
}

fn declare(cli: &mut CommandLine) -> Result<(), AppError> {
    cli.option(options::slb())?
        .option(
            OptionSpec::new(
                WARNING_THRESHOLD,
                Some("-w"),
                "--warning PCT",
                "Warning threshold, as percent (0-100)",
            )
            .with_default(80.0)
            .with_transform(|v| v.trim().parse::<f64>()),
        )?
        .option(
            OptionSpec::new(
                CRITICAL_THRESHOLD,
                Some("-c"),
                "--critical PCT",
                "Critical threshold, as percent (0-100)",
            )
            .with_default(90.0)
            .with_transform(|v| v.trim().parse::<f64>()),
        )?
        .option(options::verbose())?
        .option(options::version())?;
    Ok(())
}

fn check(cli: &mut CommandLine) -> Result<Outcome, AppError> {
    if let ParseOutcome::Stop(stop) = cli.parse_env()? {
        return Ok(Outcome::Stopped(stop.output));
    }
    logging::init(cli.flag(options::VERBOSE)?);

    let slb: String = cli.require(options::SLB, "please specify the SLB host:port")?;
    let warning: f64 = cli.require(WARNING_THRESHOLD, "please specify warning threshold")?;
    let critical: f64 = cli.require(CRITICAL_THRESHOLD, "please specify critical threshold")?;

    let api = A10RestApi::new(&slb, ClientConfig::from_env()?)?;
    let memory = A10LoadBalancer::new(api).memory()?;
    let percent = memory.percent_used();
    debug!(percent, warning, critical, "memory usage");

    let message = format!(
        "memory usage is {percent:.1}% ({} of {})",
        pretty_size(memory.used_bytes),
        pretty_size(memory.total_bytes)
    );
    Ok(Outcome::Checked(CheckResult::new(
        Status::from_thresholds(percent, warning, critical),
        message,
    )))
}
