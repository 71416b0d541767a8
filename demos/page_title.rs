//! Pull the title and charset out of an HTML page.
//!
//! Reads the page from the file given as the first argument, or from stdin.
//! Set `RUST_LOG=scan_rust=trace` to watch the scan.

use std::io::Read;
use std::process;

use scan_rust::{scan, slots};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let body = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("read {} failed: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut body = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut body) {
                eprintln!("read stdin failed: {}", err);
                process::exit(1);
            }
            body
        }
    };

    let (mut head, mut title, mut tail) = (String::new(), String::new(), String::new());
    if let Err(err) = scan("%s<title>%s</title>%s", &body)
        .bind_all(&mut slots![&mut head, &mut title, &mut tail])
    {
        eprintln!("title scan failed: {}", err);
        process::exit(1);
    }
    println!("title is {}", title);

    let mut charset = String::new();
    match scan("%s<meta charset=\"%s\"%s", &body).bind_one(1, &mut charset) {
        Ok(()) => println!("charset is {}", charset),
        Err(err) => println!("no charset: {}", err),
    }
}
