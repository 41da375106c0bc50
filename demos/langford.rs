use xcc::examples::langford::{langford, sequence};
use xcc::solver::stats::render_stats_table;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <N>", args[0]);
        std::process::exit(1);
    }
    let n: usize = args[1].parse().expect("N must be an integer");

    tracing_subscriber::fmt::init();

    let mut search = langford(n).expect("a valid Langford instance");
    let mut count = 0usize;
    while let Some(solution) = search.next_solution() {
        count += 1;
        if count <= 4 {
            let pairing = sequence(n, &solution);
            let rendered: Vec<String> = pairing.iter().map(usize::to_string).collect();
            println!("{}", rendered.join(" "));
        }
    }
    println!("Langford pairings of order {n}: {count}");
    println!("{}", render_stats_table(search.stats()));
}
