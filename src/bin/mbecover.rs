// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use mbecover::bnb::{BranchAndBound, Cutoff, NoCutoff, TimeBudget};
use mbecover::config::{dimensions_from_filename, validate_config, EngineConfig, SearchMethod};
use mbecover::error::{Error, Result};
use mbecover::graph::parse_instance;
use mbecover::mbe::Engine;
use mbecover::ordering::{self, OrderingStrategy};
use mbecover::result::SolveResult;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the instance file (§6 `n`/`e`/`g` record format).
    fname: String,

    /// Maximum scope width a mini-bucket may reach.
    #[clap(short = 'w', long, default_value = "4")]
    max_variables: usize,

    /// Comma-separated list of vertex ids giving an explicit elimination
    /// order. Defaults to decreasing-degree ordering.
    #[clap(short, long)]
    ordering: Option<String>,

    /// Search procedure to run. Only "bnb" is implemented.
    #[clap(short, long, default_value = "bnb")]
    search_method: String,

    /// Number of cost dimensions. Defaults to sniffing the instance
    /// filename's `n<N>_ep<P>_d<D>` convention, then the instance file
    /// itself if that fails.
    #[clap(short, long)]
    dimensions: Option<usize>,

    /// Capacity of the engine's LRU memoization caches.
    #[clap(short, long, default_value = "300000")]
    cache_capacity: usize,

    /// Stop the search after this many seconds, returning the best
    /// incumbent found so far.
    #[clap(short, long)]
    timeout_secs: Option<u64>,

    /// Where to write the JSON result. Defaults to stdout.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::InstanceParse { .. } => 2,
        Error::ConfigInvalid(_) => 3,
        Error::EliminateSingleton | Error::TypeMismatch => 4,
        Error::Io(_) => 5,
        Error::Json(_) => 6,
    }
}

fn run(args: &Args) -> Result<()> {
    let search_method = match args.search_method.as_str() {
        "bnb" => SearchMethod::BranchAndBound,
        "nsga2" | "nsga-ii" => SearchMethod::NsgaII,
        other => {
            return Err(Error::ConfigInvalid(format!(
                "unknown search method '{other}'"
            )))
        }
    };
    if search_method == SearchMethod::NsgaII {
        return Err(Error::ConfigInvalid(
            "the genetic (NSGA-II) solver is not implemented by this crate".to_string(),
        ));
    }

    let dimensions = args
        .dimensions
        .or_else(|| dimensions_from_filename(&args.fname));

    let config = EngineConfig {
        max_variables: args.max_variables,
        ordering: OrderingStrategy::default(),
        dimensions,
        cache_capacity: args.cache_capacity,
    };
    validate_config(&config)?;

    let (working, original) = parse_instance(&args.fname)?;

    if let Some(expected) = config.dimensions {
        if working.dimensions() != expected {
            return Err(Error::ConfigInvalid(format!(
                "instance declares {} cost dimensions, expected {expected}",
                working.dimensions()
            )));
        }
    }

    let strategy = match &args.ordering {
        Some(csv) => OrderingStrategy::Custom(csv.split(',').map(str::to_string).collect()),
        None => config.ordering.clone(),
    };
    let order = ordering::build(&working, &strategy)?;

    let start = Instant::now();
    // `working`'s vertex costs are mutated via `split` while `Engine::build`
    // compiles the mini-bucket chain; `original` is kept aside, untouched,
    // for full-assignment checks.
    let engine = Engine::build(
        working,
        original,
        order,
        config.max_variables,
        config.cache_capacity,
    )?;

    let front = if let Some(secs) = args.timeout_secs {
        let cutoff = TimeBudget::new(Duration::from_secs(secs));
        run_search(&engine, &cutoff)
    } else {
        let cutoff = NoCutoff;
        run_search(&engine, &cutoff)
    };
    let elapsed = start.elapsed();

    let result = SolveResult::new(&front, elapsed);
    let json = serde_json::to_string_pretty(&result)?;
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_search<C: Cutoff>(engine: &Engine, cutoff: &C) -> mbecover::pareto::ParetoSet {
    let bnb = BranchAndBound::new(engine, cutoff);
    bnb.run()
}
