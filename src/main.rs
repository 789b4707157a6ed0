use std::path::Path;

use clap::{Arg, Command};

use pacer::parsing;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt::init();

    let matches = Command::new("pacer")
        .version(VERSION)
        .propagate_version(true)
        .about("The Pacer scenario language for web load testing.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Parse the given scenario file and report any problems")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the scenarios you want to check."),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Parse the given scenario file and print the resolved scenarios as JSON")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the scenarios you want to dump."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                check(Path::new(filename));
            }
        }
        Some(("dump", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                dump(Path::new(filename));
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: pacer [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn parse_or_exit(filename: &Path) -> pacer::language::ScenarioSet {
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}: {}", filename.display(), error);
            std::process::exit(1);
        }
    };

    match parsing::parse(filename, &content) {
        Ok(set) => set,
        Err(error) => {
            eprintln!("{}", error.full_details());
            std::process::exit(1);
        }
    }
}

fn check(filename: &Path) {
    let set = parse_or_exit(filename);

    println!(
        "{}: {} scenario{}, {} group{}",
        filename.display(),
        set.len(),
        if set.len() == 1 { "" } else { "s" },
        set.groups
            .len(),
        if set
            .groups
            .len()
            == 1
        {
            ""
        } else {
            "s"
        }
    );
}

fn dump(filename: &Path) {
    let set = parse_or_exit(filename);

    match serde_json::to_string_pretty(&set) {
        Ok(json) => println!("{}", json),
        Err(error) => {
            eprintln!("{}: {}", filename.display(), error);
            std::process::exit(1);
        }
    }
}
