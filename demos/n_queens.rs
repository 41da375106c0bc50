use xcc::examples::queens::{queens, square};
use xcc::solver::stats::render_stats_table;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <N>", args[0]);
        std::process::exit(1);
    }
    let n: usize = args[1].parse().expect("N must be an integer");

    tracing_subscriber::fmt::init();

    let mut search = queens(n).expect("every rank and file has candidate squares");
    let mut count = 0usize;
    while let Some(solution) = search.next_solution() {
        count += 1;
        if count == 1 {
            println!("First placement found:");
            print_board(n, &solution);
        }
    }
    println!("{n}-queens placements: {count}");
    println!("{}", render_stats_table(search.stats()));
}

fn print_board(n: usize, solution: &[usize]) {
    let mut files = vec![0usize; n];
    for &option in solution {
        let (rank, file) = square(n, option);
        files[rank] = file;
    }
    for &queen_file in &files {
        let mut row = String::new();
        for file in 0..n {
            row.push(if file == queen_file { 'Q' } else { '.' });
            row.push(' ');
        }
        println!("{}", row.trim_end());
    }
}
