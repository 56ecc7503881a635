use std::process;

use clap::{App, Arg};
use separator::Separatable;

use sokosolve::config::{HeuristicKind, Method};
use sokosolve::solver::{SearchObserver, SearchResult, Stats};
use sokosolve::{LoadLevel, Solve};

/// Prints progress whenever the search reaches a new depth.
struct StatusPrinter;

impl SearchObserver for StatusPrinter {
    fn on_depth(&mut self, depth: i32, stats: &Stats) {
        println!("Visited new depth: {}", depth);
        println!("{:?}", stats);
    }
}

fn main() {
    env_logger::init();

    let matches = App::new("sokosolve")
        .version("0.1")
        .arg(Arg::with_name("method")
            .short("-m")
            .long("--method")
            .takes_value(true)
            .possible_values(&["a-star", "greedy", "bfs", "dfs"])
            .default_value("a-star")
            .help("search method"))
        .arg(Arg::with_name("heuristic")
            .long("--heuristic")
            .takes_value(true)
            .possible_values(&[
                "manhattan",
                "manhattan-improved",
                "player-distance",
                "combined",
                "manhattan-deadlock",
                "combined-deadlock",
            ])
            .default_value("manhattan")
            .help("heuristic for the informed methods (bfs and dfs ignore it)"))
        .arg(Arg::with_name("prune")
            .long("--prune")
            .help("prune deadlocked pushes in bfs and dfs"))
        .arg(Arg::with_name("quiet")
            .short("-q")
            .long("--quiet")
            .help("print only the solution and a few counters"))
        .arg(Arg::with_name("replay")
            .long("--replay")
            .help("print the board after every push of the solution"))
        .arg(Arg::with_name("file")
            .required(true))
        .get_matches();

    // Clap has already rejected anything outside possible_values.
    let heuristic: HeuristicKind = matches.value_of("heuristic").unwrap().parse().unwrap();
    let prune = matches.is_present("prune");
    let method = match matches.value_of("method").unwrap() {
        "a-star" => Method::AStar(heuristic),
        "greedy" => Method::Greedy(heuristic),
        "bfs" => Method::Bfs { prune },
        "dfs" => Method::Dfs { prune },
        _ => unreachable!("clap validates the method"),
    };
    let quiet = matches.is_present("quiet");
    let replay = matches.is_present("replay");

    let path = matches.value_of("file").unwrap();
    let level = path.load_level().unwrap_or_else(|err| {
        println!("Can't load level {}: {}", path, err);
        process::exit(1);
    });

    let mut observer: Box<dyn SearchObserver> = if quiet {
        Box::new(())
    } else {
        println!("Solving {} using {}...", path, method);
        Box::new(StatusPrinter)
    };
    let result = level.solve(method, &mut *observer);

    match result {
        SearchResult::Solved(solution) => {
            if quiet {
                println!("{}", solution.moves);
                println!("Moves: {}", solution.moves.move_cnt());
                println!("Pushes: {}", solution.moves.push_cnt());
                println!("Expanded: {}", solution.stats.total_unique_visited());
                println!("Frontier: {}", solution.stats.frontier());
            } else {
                print!("{}", solution.stats);
                println!(
                    "Solved in {} ms",
                    (solution.elapsed.as_millis() as u64).separated_string()
                );
                if replay {
                    println!("Found solution:");
                    print!("{}", level.xsb_solution(&solution.moves, false));
                }
                println!("{}", solution.moves);
                println!("Moves: {}", solution.moves.move_cnt());
                println!("Pushes: {}", solution.moves.push_cnt());
            }
        }
        SearchResult::NoSolution(failure) => {
            if quiet {
                println!("No solution");
                println!("Expanded: {}", failure.stats.total_unique_visited());
                println!("Frontier: {}", failure.stats.frontier());
            } else {
                print!("{}", failure.stats);
                println!(
                    "No solution, searched {} ms",
                    (failure.elapsed.as_millis() as u64).separated_string()
                );
            }
        }
    }
}
