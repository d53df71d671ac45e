//! One invocation: read, parse, run the pipeline, write.
//!
//! # Design
//! Every failure is terminal. Which way it is reported depends on the
//! exit-code policy in force when it happened: before the input is parsed
//! that is the flag value, afterwards the (possibly overridden) config value.
//! `Failure` carries that policy and the best-known status back to `main`.

use anyhow::Context;
use log::debug;
use reqpipe_core::{prepare, Outcome, Pipeline, RequestConfig, Transport};

use crate::args::Args;
use crate::io::{read_input, write_output};
use crate::logging;

/// A successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub status: u16,
    pub exit_as_return_code: bool,
}

/// A failed run and how to report it.
#[derive(Debug)]
pub struct Failure {
    pub error: anyhow::Error,
    /// Best-known HTTP status, 0 if none.
    pub status: u16,
    pub exit_as_return_code: bool,
}

impl Failure {
    fn new(error: impl Into<anyhow::Error>, status: u16, exit_as_return_code: bool) -> Self {
        Self {
            error: error.into(),
            status,
            exit_as_return_code,
        }
    }
}

pub fn execute<T: Transport>(args: &Args, transport: &mut T) -> Result<Completion, Failure> {
    let config = args
        .to_config()
        .map_err(|e| Failure::new(e, 0, args.exit_as_return_code))?;
    let input = read_input(&args.input).map_err(|e| Failure::new(e, 0, args.exit_as_return_code))?;

    let (config, body) = prepare(config, &input)
        .context("invalid request descriptor")
        .map_err(|e| Failure::new(e, 0, args.exit_as_return_code))?;
    let policy = config.exit_as_return_code;

    logging::set_verbose(config.verbose);
    report_options(args, &config, &body);

    let pipeline = Pipeline::new(config).map_err(|e| Failure::new(e, 0, policy))?;
    let outcome = pipeline.run(&body, transport).map_err(|e| {
        let status = e.status();
        Failure::new(e, status, policy)
    })?;
    report_outcome(args, &outcome);

    write_output(&args.output, &outcome.render(policy)).map_err(|e| Failure::new(e, outcome.status, policy))?;

    Ok(Completion {
        status: outcome.status,
        exit_as_return_code: policy,
    })
}

fn report_options(args: &Args, config: &RequestConfig, body: &[u8]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    match serde_json::to_string_pretty(config) {
        Ok(json) => debug!("options parsed:\n{json}"),
        Err(e) => debug!("options parsed (not serializable: {e}): {config:?}"),
    }
    let input = if args.input.is_empty() { "<stdin>" } else { args.input.as_str() };
    debug!(
        "input {input}: {} {} headers={:?} body={:?}",
        config.method,
        config.url,
        config.headers,
        String::from_utf8_lossy(body)
    );
}

fn report_outcome(args: &Args, outcome: &Outcome) {
    for stage in outcome.trace.stages() {
        debug!("{}: {:?}", stage.label, stage.snapshot);
    }
    let output = if args.output.is_empty() { "<stdout>" } else { args.output.as_str() };
    debug!(
        "output {output}: status={} body={:?}",
        outcome.status,
        String::from_utf8_lossy(&outcome.body)
    );
}
