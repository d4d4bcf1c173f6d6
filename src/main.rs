use clap::{App, Arg, ArgMatches};
use dpllsat::formula::dimacs::{parse, parse_file};
use dpllsat::report::{timed, OutputFormat, Report};
use dpllsat::*;
use log::{error, info, LevelFilter};
use std::error::Error;
use std::path::Path;

fn main() {
    let matches = App::new("dpllsat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decides satisfiability of a DIMACS CNF formula")
        .arg(Arg::with_name("INPUT").help("input file (in CNF), stdin if absent").index(1))
        .arg(
            Arg::with_name("format")
                .long("format")
                .takes_value(true)
                .possible_values(&["json", "dimacs"])
                .default_value("json")
                .help("output format"),
        )
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("check the model against the formula before reporting it"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more (-v info, -vv debug, -vvv trace)"),
        )
        .get_matches();

    configure_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn configure_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let format: OutputFormat = matches.value_of("format").unwrap_or("json").parse()?;

    let (instance, formula) = match matches.value_of("INPUT") {
        Some(path) => {
            let instance = Path::new(path)
                .file_name()
                .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned());
            (instance, parse_file(path))
        }
        None => ("<stdin>".to_string(), parse(std::io::stdin())),
    };
    let formula = formula.map_err(|e| format!("parse error: {}", describe(&e)))?;
    info!("{}: {} clauses over {} variables", instance, formula.len(), formula.num_variables());

    let mut solver = Solver::new(formula.clone());
    let (result, elapsed) = timed(|| solver.solve());
    info!("{:?}", solver.statistics());

    if matches.is_present("verify") {
        if let Some(model) = result.model() {
            if !formula.is_satisfied_by(model) {
                return Err("model does not satisfy the formula".to_string());
            }
            info!("model verified");
        }
    }

    let report = Report {
        instance: &instance,
        elapsed,
        result: &result,
    };
    report
        .write(format, &mut std::io::stdout().lock())
        .map_err(|e| format!("cannot write result: {}", e))
}

/// The error message followed by its causes.
fn describe(e: &DimacsParseError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
