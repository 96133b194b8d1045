//! eob-extract CLI

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::EnvFilter;

use eob_extract::batch::{read_file_list, BatchPlan, BatchRunner};
use eob_extract::config::Config;
use eob_extract::Extractor;

const USAGE: &str = "\
Usage: eob-extract [options]

Options:
  -h, --help             Display this help message
  -i, --input <file>     Input file
  -l, --list <file>      Input filelist
  -o, --output <file>    Output file (single input only)
  -p, --prefix <str>     Output prefix
  -b, --bursts <n>       Number of bursts to process
  -c, --config <file>    Configuration file (TOML)";

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    help: bool,
    input: Option<PathBuf>,
    list: Option<PathBuf>,
    output: Option<PathBuf>,
    prefix: Option<String>,
    bursts: Option<usize>,
    config: Option<PathBuf>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        let mut iter = args.iter().skip(1);

        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("Option {arg} needs a value"))
            };

            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "-i" | "--input" => options.input = Some(value()?.into()),
                "-l" | "--list" => options.list = Some(value()?.into()),
                "-o" | "--output" => options.output = Some(value()?.into()),
                "-p" | "--prefix" => options.prefix = Some(value()?),
                "-b" | "--bursts" => {
                    let raw = value()?;
                    let n = raw
                        .parse()
                        .with_context(|| format!("Invalid burst count: {raw}"))?;
                    options.bursts = Some(n);
                }
                "-c" | "--config" => options.config = Some(value()?.into()),
                other => bail!("Unknown option: {other}"),
            }
        }

        Ok(options)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args).await {
        eprintln!("Error: {e:#}");
        eprintln!("Run 'eob-extract --help' for usage information.");
        process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let options = Options::parse(args)?;

    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut inputs = Vec::new();
    if let Some(input) = &options.input {
        inputs.push(input.clone());
    }
    if let Some(list) = &options.list {
        inputs.extend(read_file_list(list)?);
    }

    let stdout = io::stdout();
    let mut log = stdout.lock();

    if inputs.is_empty() {
        writeln!(log, "No input files specified!")?;
        return Ok(());
    }

    let extractor = Extractor::new(config);
    let runner = BatchRunner::new(&extractor);

    if let Some(output) = &options.output {
        if inputs.len() == 1 {
            runner.run_single(&inputs[0], output, &mut log).await;
            return Ok(());
        }
        writeln!(log, "Output filename is only compatible with a single file!")?;
    }

    let plan = BatchPlan {
        inputs,
        prefix: options.prefix,
        limit: options.bursts,
    };
    runner.run(&plan, &mut log).await?;

    Ok(())
}
