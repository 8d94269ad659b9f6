//! Interactive menu driving the peer operations.
//!
//! Presentation only: every failure arrives as a classified `ApiError` and
//! is rendered here; nothing is retried or reinterpreted at this layer.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::api::{ApiError, WgEasyClient};

pub async fn run(client: &WgEasyClient) -> Result<()> {
    loop {
        print_menu();
        let Some(choice) = prompt("Select an action: ")? else {
            break;
        };

        match choice.trim() {
            "1" => {
                let Some(name) = prompt("Peer name: ")? else { break };
                report(
                    client.create_peer(name.trim()).await,
                    "Peer created successfully",
                );
            }
            "2" => {
                let Some(peer_id) = prompt("Peer ID: ")? else { break };
                report(
                    client.delete_peer(peer_id.trim()).await,
                    "Peer deleted successfully",
                );
            }
            "3" => {
                let Some(peer_id) = prompt("Peer ID: ")? else { break };
                report(
                    client.enable_peer(peer_id.trim()).await,
                    "Peer enabled successfully",
                );
            }
            "4" => {
                let Some(peer_id) = prompt("Peer ID: ")? else { break };
                report(
                    client.disable_peer(peer_id.trim()).await,
                    "Peer disabled successfully",
                );
            }
            "5" => list_peers(client).await,
            "6" => {
                let Some(name) = prompt("Peer name: ")? else { break };
                match client.peer_id_by_name(name.trim()).await {
                    Ok(Some(id)) => println!("Peer ID: {id}"),
                    Ok(None) => println!("Peer not found."),
                    Err(e) => print_error(&e),
                }
            }
            "7" => {
                let Some(subname) = prompt("Peer subname: ")? else { break };
                match client.peer_ids_by_subname(subname.trim()).await {
                    Ok(ids) if ids.is_empty() => println!("No matching peers."),
                    Ok(ids) => {
                        println!("Matching peer IDs:");
                        for id in ids {
                            println!("  {id}");
                        }
                    }
                    Err(e) => print_error(&e),
                }
            }
            "0" => break,
            "" => {}
            other => println!("Unknown choice: {other}"),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_menu() {
    println!();
    println!("Available actions:");
    println!("1. Create a peer");
    println!("2. Delete a peer");
    println!("3. Enable a peer");
    println!("4. Disable a peer");
    println!("5. List peers");
    println!("6. Find peer ID by name");
    println!("7. Find peer IDs by subname");
    println!("0. Exit");
}

async fn list_peers(client: &WgEasyClient) {
    match client.list_peers().await {
        Ok(peers) if peers.is_empty() => println!("No peers found."),
        Ok(peers) => {
            println!("Peer list:");
            for (i, peer) in peers.iter().enumerate() {
                let mut line = format!(
                    "{}. {} (ID: {}) - {}",
                    i + 1,
                    peer.name,
                    peer.id,
                    peer.status_marker()
                );
                if let Some(transfer) = peer.display_transfer() {
                    line.push_str(&format!(" [{transfer}]"));
                }
                println!("{line}");
            }
        }
        Err(e) => print_error(&e),
    }
}

fn report(outcome: Result<(), ApiError>, success_message: &str) {
    match outcome {
        Ok(()) => println!("{success_message}"),
        Err(e) => print_error(&e),
    }
}

fn print_error(error: &ApiError) {
    match error {
        ApiError::Network(e) => {
            println!("No response received from the server: {e}");
            println!("Check the URL and try again.");
        }
        ApiError::Client { status, message } | ApiError::Server { status, message } => {
            println!("Server responded with status {status}: {message}");
        }
        other => println!("Error: {other}"),
    }
}

fn prompt(question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

/// Read one line, returning `None` at end of input so a closed stdin ends
/// the session instead of spinning on empty reads. A bare Enter is a
/// non-empty read (`"\n"`) and stays a `Some`.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
