use std::{env, process};

fn main() {
    stockbook::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = stockbook::cli::run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
