//! CHRONOKV - Temporal Key-Value Store
//! Interactive shell over an in-memory store on the system clock.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use bytes::Bytes;

use chronokv::store::Store;
use chronokv::types::Timestamp;

fn print_value(value: Option<Bytes>) {
    match value {
        Some(value) => match std::str::from_utf8(&value) {
            Ok(s) => println!("  \"{}\"", s),
            Err(_) => println!("  <binary data>"),
        },
        None => println!("  (nil)"),
    }
}

fn main() {
    env_logger::init();

    println!();
    println!("  ╔═══════════════════════════════════════════╗");
    println!("  ║              CHRONOKV Store               ║");
    println!("  ║    Temporal Key-Value Store v1.0.0        ║");
    println!("  ╚═══════════════════════════════════════════╝");
    println!();
    println!("  Commands:");
    println!("    set <key> <value> [ttl_ms] - Store a value, optionally expiring");
    println!("    get <key>                  - Retrieve the current value");
    println!("    getat <key> <micros>       - Retrieve the value at a past instant");
    println!("    del <key>                  - Delete a key");
    println!("    exists <key>               - Check whether a key is live");
    println!("    state <key>                - Show a key's state");
    println!("    ttl <key>                  - Show remaining TTL");
    println!("    history <key>              - List every version of a key");
    println!("    size                       - Count live keys");
    println!("    now                        - Show the store clock");
    println!("    cleanup                    - Drop expired keys");
    println!("    compact                    - Prune unobservable history");
    println!("    stats                      - Show store metrics");
    println!("    clear                      - Drop everything");
    println!("    exit                       - Quit");
    println!();

    let store: Store<Bytes> = Store::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("chronokv> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break, // EOF
            Ok(_) => {}
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "set" | "put" => {
                if parts.len() < 3 {
                    println!("  Usage: set <key> <value> [ttl_ms]");
                    continue;
                }
                let (value_parts, ttl) = match parts.len() {
                    n if n > 3 => match parts[n - 1].parse::<u64>() {
                        Ok(ms) => (&parts[2..n - 1], Some(Duration::from_millis(ms))),
                        Err(_) => (&parts[2..], None),
                    },
                    _ => (&parts[2..], None),
                };
                let value = Bytes::from(value_parts.join(" "));
                match store.set(parts[1], value, ttl) {
                    Ok(()) => println!("  OK"),
                    Err(e) => println!("  ERROR: {}", e),
                }
            }
            "get" => {
                if parts.len() < 2 {
                    println!("  Usage: get <key>");
                    continue;
                }
                print_value(store.get(parts[1]));
            }
            "getat" | "asof" => {
                if parts.len() < 3 {
                    println!("  Usage: getat <key> <micros>");
                    continue;
                }
                match parts[2].parse::<u64>() {
                    Ok(micros) => {
                        print_value(store.get_at_time(parts[1], Timestamp::from_micros(micros)))
                    }
                    Err(_) => println!("  ERROR: invalid timestamp '{}'", parts[2]),
                }
            }
            "del" | "delete" => {
                if parts.len() < 2 {
                    println!("  Usage: del <key>");
                    continue;
                }
                if store.delete(parts[1]) {
                    println!("  OK (deleted)");
                } else {
                    println!("  (not found)");
                }
            }
            "exists" => {
                if parts.len() < 2 {
                    println!("  Usage: exists <key>");
                    continue;
                }
                println!("  {}", store.exists(parts[1]));
            }
            "state" => {
                if parts.len() < 2 {
                    println!("  Usage: state <key>");
                    continue;
                }
                println!("  {:?}", store.state(parts[1]));
            }
            "ttl" => {
                if parts.len() < 2 {
                    println!("  Usage: ttl <key>");
                    continue;
                }
                match store.ttl(parts[1]) {
                    Some(remaining) => println!("  {} ms", remaining.as_millis()),
                    None => println!("  (no ttl)"),
                }
            }
            "history" | "log" => {
                if parts.len() < 2 {
                    println!("  Usage: history <key>");
                    continue;
                }
                let history = store.history(parts[1]);
                if history.is_empty() {
                    println!("  (empty)");
                    continue;
                }
                for record in &history {
                    let payload = match record.value() {
                        Some(value) => String::from_utf8_lossy(value).into_owned(),
                        None => "<tombstone>".to_string(),
                    };
                    match record.ttl() {
                        Some(ttl) => println!(
                            "  @{} #{} {} (ttl {} ms)",
                            record.timestamp(),
                            record.seq(),
                            payload,
                            ttl.as_millis()
                        ),
                        None => println!("  @{} #{} {}", record.timestamp(), record.seq(), payload),
                    }
                }
                println!("  ({} versions)", history.len());
            }
            "size" => println!("  {} live keys", store.size()),
            "now" => println!("  {}", store.now()),
            "cleanup" => println!("  {} expired keys dropped", store.cleanup_expired()),
            "compact" => println!("  {}", store.compact()),
            "stats" | "info" => println!("{}", store.metrics().report()),
            "clear" => {
                store.clear();
                println!("  OK (cleared)");
            }
            "exit" | "quit" | "q" => {
                println!("  Shutting down CHRONOKV...");
                break;
            }
            _ => {
                println!("  Unknown command: '{}'. Type 'exit' to quit.", parts[0]);
            }
        }
    }
}
