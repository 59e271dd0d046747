use std::env;
use std::fs;
use std::io::{self, Read, Write};

use clap::{values_t, App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use anyhow::Error;

use tinycdcl::config::{SolverConfig, SolverConfigUpdate};
use tinycdcl::solver::{SolveResult, Solver};

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("TINYCDCL_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is tinycdcl {}", env!("TINYCDCL_VERSION"));
    info!(
        "  {} build - {}",
        env!("TINYCDCL_PROFILE"),
        env!("TINYCDCL_RUSTC_VERSION")
    );
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("tinycdcl")
        .version(env!("TINYCDCL_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("[INPUT] 'The DIMACS CNF file to solve (stdin if omitted)'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read parameters from a config file'")
        .arg(
            Arg::from_usage("[config-option] -C --config-option")
                .value_name("OPTION>=<VALUE")
                .help("Set a single config option, see 'tinycdcl -C help' for the list.")
                .multiple(true)
                .number_of_values(1),
        )
        .get_matches();

    if values_t!(matches, "config-option", String)
        .unwrap_or_default()
        .iter()
        .any(|option| option == "help")
    {
        print!("{}", SolverConfig::help());
        return Ok(0);
    }

    init_logging();
    banner();

    let mut config_update = SolverConfigUpdate::new();

    if let Some(config_path) = matches.value_of("config-file") {
        let mut config_contents = String::new();
        fs::File::open(config_path)?.read_to_string(&mut config_contents)?;
        config_update.merge(toml::from_str(&config_contents)?);
    }

    for config_option in values_t!(matches, "config-option", String).unwrap_or_default() {
        config_update.merge(toml::from_str(&config_option)?);
    }

    let mut config = SolverConfig::default();
    config.update(&config_update);

    let mut solver = Solver::with_config(config);

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file: &mut dyn Read = match matches.value_of("INPUT") {
        Some(path) => {
            info!("reading file '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file
        }
        None => {
            info!("reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin
        }
    };

    solver.add_dimacs_cnf(file)?;

    let result = solver.solve()?;
    let stats = solver.stats();

    let exit_code = match result {
        SolveResult::Sat => {
            println!("s SATISFIABLE");
            print!("v");
            for lit in solver.model().unwrap() {
                print!(" {}", lit);
            }
            println!(" 0");
            10
        }
        SolveResult::Unsat => {
            println!("s UNSATISFIABLE");
            20
        }
        SolveResult::Unknown => {
            // Unreachable in practice: the CLI always solves without a conflict limit.
            println!("s UNKNOWN");
            0
        }
    };

    println!(
        "c mem_used={} conflicts={} max_lemmas={}",
        stats.mem_used, stats.conflicts, stats.max_lemmas
    );

    Ok(exit_code)
}
