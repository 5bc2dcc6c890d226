use gini_tree::data::source::CsvSource;
use gini_tree::evaluation::evaluate;
use gini_tree::evaluation::params::EvaluationConfig;
use gini_tree::trees::classifier::GiniTreeClassifier;
use std::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: gini-tree-eval <table.csv> <build_rows> [--no-headers] [--delimiter C] [--seed N] [--save PATH]";

struct Args {
    source: CsvSource,
    build_rows: usize,
    seed: Option<u64>,
    save: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let build_rows = args.next().ok_or(USAGE)?.parse::<usize>()?;

    let mut source = CsvSource::new(path);
    let mut seed = None;
    let mut save = None;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--no-headers" => source = source.with_headers(false),
            "--delimiter" => {
                let delimiter = args.next().ok_or(USAGE)?;
                let &[byte] = delimiter.as_bytes() else {
                    return Err("The delimiter must be a single byte.".into());
                };
                source = source.with_delimiter(byte);
            }
            "--seed" => seed = Some(args.next().ok_or(USAGE)?.parse::<u64>()?),
            "--save" => save = Some(args.next().ok_or(USAGE)?),
            other => return Err(format!("Unknown argument {other}\n{USAGE}").into()),
        }
    }

    Ok(Args {
        source,
        build_rows,
        seed,
        save,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let config = EvaluationConfig::with_params(args.source, args.build_rows, args.seed)?;
    let (tree, report): (GiniTreeClassifier<f64>, _) = evaluate(&config)?;

    println!("% of right prediction: {}", report.accuracy * 100.0);
    println!(
        "Built on {} row(s), tested on {} row(s), depth {}, {} leaves.",
        report.build_rows, report.test_rows, report.depth, report.leaves
    );
    if let Some(path) = args.save {
        tree.save_tree(&path)?;
        println!("Saved tree to {path}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
