//! royale-store-file - local JSON-file store backend for royale
//!
//! This binary implements the royale store protocol, communicating
//! with royale via JSON over stdin/stdout.
//!
//! Collections live under the user data directory (or $ROYALE_STORE_DIR),
//! one directory per collection, one pretty-printed JSON file per
//! document, named by its store-assigned uuid.

mod storage;

use royale_core::store::protocol::{Command, Request, Response};
use serde::Deserialize;
use std::io::{self, BufRead, Write};

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = Response::error(&format!("Failed to parse request: {}", e));
                writeln!(stdout, "{}", response).unwrap();
                stdout.flush().unwrap();
                continue;
            }
        };

        let response = handle_request(request);

        writeln!(stdout, "{}", response).unwrap();
        stdout.flush().unwrap();
    }
}

fn handle_request(request: Request) -> String {
    match request.command {
        Command::ListAll => handle_list_all(&request.params),
        Command::Delete => handle_delete(&request.params),
        Command::Insert => handle_insert(&request.params),
    }
}

#[derive(Debug, Deserialize)]
struct ListAllParams {
    collection: String,
}

fn handle_list_all(params: &serde_json::Value) -> String {
    let params: ListAllParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    match storage::list_all(&params.collection) {
        Ok(ids) => Response::success(ids),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    collection: String,
    doc_id: String,
}

fn handle_delete(params: &serde_json::Value) -> String {
    let params: DeleteParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    match storage::delete(&params.collection, &params.doc_id) {
        Ok(()) => Response::success(()),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct InsertParams {
    collection: String,
    record: serde_json::Value,
}

fn handle_insert(params: &serde_json::Value) -> String {
    let params: InsertParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    match storage::insert(&params.collection, params.record) {
        Ok(id) => Response::success(id),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}
