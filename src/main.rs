use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = merisadak::app::run_cli() {
        eprintln!("{}", e.bold().red());
        exit(1);
    }
}
