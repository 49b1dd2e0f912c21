use clap::{value_parser, Arg, ArgAction, Command};
use prometheus_client::{encoding::text::encode, registry::Registry};
use roster_console::{menu, prompt::Prompt, Config};
use roster_storage::{
    access,
    file::{self, Store},
    record::{Record, Student},
};
use std::{
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
};
use tracing::{info, Level};

fn main() {
    // Parse arguments
    let matches = Command::new("roster-console")
        .about("add and find students in a single-file record store")
        .arg(
            Arg::new("config")
                .long("config")
                .required(false)
                .help("Path to YAML config file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("warn")
                .help("Maximum level of logs written to stderr")
                .value_parser(value_parser!(Level)),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Write logs as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .help("Print metrics on exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Create logger
    let level = *matches.get_one::<Level>("log-level").unwrap();
    if matches.get_flag("json-logs") {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }

    // Load config
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("Could not read config file");
            Config::parse(&raw).expect("Could not parse config file")
        }
        None => Config::default(),
    };
    info!(
        path = %config.path.display(),
        kind = ?config.kind,
        max_key = config.max_key,
        "loaded config"
    );

    // Open the store (creating it if missing)
    let store = match Store::open(config.store()) {
        Ok(store) => store,
        Err(file::Error::OpenFailed(_, err)) if err.kind() == ErrorKind::NotFound => {
            info!(path = %config.path.display(), "creating store");
            Store::create(config.store(), Student::schema()).expect("Could not create store")
        }
        Err(err) => panic!("Could not open store: {err}"),
    };
    let mut access = access::init::<Student>(config.kind.into(), store, config.access())
        .expect("Could not initialize access");
    let mut registry = Registry::default();
    access.register(&mut registry);

    // Run the menu
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());
    menu::run(access.as_mut(), &mut prompt).expect("Console failed");

    // Print metrics
    if matches.get_flag("metrics") {
        let mut buffer = String::new();
        encode(&mut buffer, &registry).expect("Could not encode metrics");
        print!("{buffer}");
    }
}
