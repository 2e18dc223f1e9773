mod attendance;
mod grades;
mod ipc;

use std::io::{self, BufRead, Write};

use serde_json::json;

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't echo an id we never parsed.
                writeln!(
                    stdout,
                    "{}",
                    json!({
                        "ok": false,
                        "error": { "code": "bad_json", "message": e.to_string() }
                    })
                )?;
                stdout.flush()?;
                continue;
            }
        };

        let resp = ipc::handle_request(req);
        writeln!(stdout, "{}", resp)?;
        stdout.flush()?;
    }
    Ok(())
}
