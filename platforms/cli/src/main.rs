use automata_engine::{
    encode_pretty, Acceptance, Automaton, AutomatonError, AutomatonLoader, Catalog, Diagram,
    ExplorationBound, Machine, DEFAULT_MAX_CONFIGURATIONS,
};
use clap::Parser;
use log::{debug, LevelFilter};
use std::io::{self, Read};
use std::path::Path;
use std::process;

/// Runs input strings through a DFA, NPDA or NTM and reports whether each is accepted.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  automata-cli --automaton anbn.json -i aabb -i aab
  automata-cli --catalog 'Even Palindromes' -i abba
  cat ends-with-a.json | automata-cli -i ab --edges

EXIT STATUS:
  0 every input accepted, 1 error, 2 some input not accepted")]
struct Cli {
    /// Path to a JSON creation payload. Can also be piped via stdin.
    #[clap(short, long, conflicts_with = "catalog")]
    automaton: Option<String>,

    /// Name of a built-in automaton.
    #[clap(short, long)]
    catalog: Option<String>,

    /// List the built-in automata and exit.
    #[clap(short, long)]
    list: bool,

    /// An input string to decide. May be repeated; an empty value tests the empty string.
    #[clap(short, long)]
    input: Vec<String>,

    /// Maximum number of configurations explored per input.
    #[clap(
        short,
        long,
        env = "AUTOMATA_MAX_CONFIGURATIONS",
        default_value_t = DEFAULT_MAX_CONFIGURATIONS
    )]
    max_configurations: usize,

    /// Print the state diagram as an edge list.
    #[clap(short, long)]
    edges: bool,

    /// Print the validated automaton as JSON.
    #[clap(long)]
    dump: bool,

    /// Log search statistics.
    #[clap(short = 'd', long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Returns whether every requested input was accepted.
fn run(cli: &Cli) -> Result<bool, AutomatonError> {
    if cli.list {
        print_catalog();
        return Ok(true);
    }

    let automaton = load_automaton(cli)?;
    debug!("Loaded {:?}", automaton.info());

    if cli.dump {
        println!("{}", encode_pretty(&automaton)?);
    }

    if cli.edges {
        print_diagram(&Diagram::from(&automaton));
    }

    if cli.input.is_empty() && !cli.dump && !cli.edges {
        let info = automaton.info();
        println!(
            "{} with {} states ({} final), {} transitions, starting in {}",
            info.kind,
            info.state_count,
            info.final_state_count,
            info.transition_count,
            info.initial_state
        );
    }

    let bound = ExplorationBound::new(cli.max_configurations);
    let mut all_accepted = true;

    for input in &cli.input {
        let acceptance = automaton.accepts(input, bound)?;
        all_accepted &= acceptance.is_accepted();

        println!("{:?}: {}", input, acceptance);

        if let Acceptance::DidNotHalt(_) = acceptance {
            debug!("Raise --max-configurations to search further");
        }
    }

    Ok(all_accepted)
}

/// Loads the automaton from the catalog, a file, or stdin, in that order.
fn load_automaton(cli: &Cli) -> Result<Automaton, AutomatonError> {
    if let Some(name) = &cli.catalog {
        Ok(Catalog::by_name(name)?.automaton.clone())
    } else if let Some(path) = &cli.automaton {
        AutomatonLoader::load_automaton(Path::new(path))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AutomatonError::FileError(format!("Failed to read from stdin: {}", e)))?;
        AutomatonLoader::load_automaton_from_string(&buffer)
    } else {
        Err(AutomatonError::FileError(
            "No automaton given: pass --automaton, --catalog, or pipe a payload via stdin"
                .to_string(),
        ))
    }
}

fn print_catalog() {
    for (index, name) in Catalog::names().iter().enumerate() {
        if let Ok(entry) = Catalog::by_index(index) {
            println!(
                "{:>2}  {:<18} {:<4} {}",
                index,
                name,
                entry.automaton.kind(),
                entry.description
            );
        }
    }
}

fn print_diagram(diagram: &Diagram) {
    println!("initial: {}", diagram.initial_state);
    println!(
        "final: {}",
        diagram
            .final_states
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    for edge in &diagram.edges {
        println!("{} --[{}]--> {}", edge.source, edge.label, edge.destination);
    }
}
