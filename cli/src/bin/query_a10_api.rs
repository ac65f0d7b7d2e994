//! Queries the A10 REST API and pretty-prints the JSON result.

use std::process::ExitCode;

use a10_monitoring_cli::format::{error_chain, write_stdout};
use a10_monitoring_cli::{AppError, logging, options};
use a10_monitoring_client::{A10RestApi, ClientConfig, ClientError, Query, parse_params};
use a10_monitoring_core::{CliError, CommandLine, OptionSpec, ParseOutcome};
use tracing::debug;

const DESCRIPTION: &str = "
Generic script to query the A10 API and pretty-print the JSON results. Accepts a
metric string and any number of parameters.

Some useful metrics:

    network.interface.get port_num=1
    network.interface.getAll
    slb.service_group.getAll
    slb.virtual_server.getAll
    slb.virtual_service.getAll
    system.device_info.cpu.current_usage.get
    system.device_info.get
    system.performance.get

Statistics:

    network.interface.fetchAllStatistics
    network.trunk.fetchAllStatistics
    slb.service_group.fetchAllStatistics
    slb.virtual_server.fetchAllStatistics
    slb.virtual_service.fetchAllStatistics
";

const EXAMPLES: &str = "__APPNAME__ -s <host> -m <method> [param=value] ...";

fn main() -> ExitCode {
    let mut cli = CommandLine::from_env()
        .with_description(DESCRIPTION)
        .with_examples(EXAMPLES);

    match declare(&mut cli).and_then(|()| run(&mut cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.flag(options::VERBOSE).unwrap_or(false) {
                eprintln!("error: {}", error_chain(&err));
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn declare(cli: &mut CommandLine) -> Result<(), AppError> {
    cli.option(options::slb())?
        .option(OptionSpec::new(
            "metric",
            Some("-m"),
            "--metric METRIC",
            "A10 metric name.",
        ))?
        .option(options::verbose())?
        .option(options::version())?;
    Ok(())
}

fn run(cli: &mut CommandLine) -> Result<(), AppError> {
    if let ParseOutcome::Stop(stop) = cli.parse_env()? {
        write_stdout(&stop.output)?;
        return Ok(());
    }
    logging::init(cli.flag(options::VERBOSE)?);

    let slb: String = cli.require(options::SLB, "please specify the SLB host:port via -s")?;
    let metric: String = cli.require("metric", "please specify the A10 metric via -m")?;
    let params = parse_params(cli.positional()).map_err(|arg| {
        CliError::Validation(format!("invalid parameter '{arg}', expected key=value"))
    })?;
    debug!(%slb, %metric, params = params.len(), "querying");

    let api = A10RestApi::new(&slb, ClientConfig::from_env()?)?;
    let response = api.query(&metric, &params)?;
    let pretty = serde_json::to_string_pretty(&response).map_err(ClientError::from)?;
    write_stdout(&format!("{pretty}\n"))?;
    Ok(())
}
