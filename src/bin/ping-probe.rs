//! ping-probe: checks an api-ping endpoint from the outside.
//!
//! `http` sends one plain ping and prints the reply with its latency. `ws` opens
//! the echo channel, sends sequence-tagged binary frames and prints a round-trip
//! summary. Either command exits non-zero when the endpoint misbehaves, after
//! printing what it saw.

use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

#[derive(Parser)]
#[command(name = "ping-probe")]
#[command(about = "Liveness and connection-quality probe for api-ping", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/")]
    url: String,

    /// Request parameter carrying the action name
    #[arg(long, default_value = "Action")]
    param: String,

    /// Action answered by the interceptor
    #[arg(long, default_value = "Ping")]
    action: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one plain ping and print the reply
    Http,
    /// Measure round trips over the WebSocket echo channel
    Ws {
        /// Number of messages to send
        #[arg(short, long, default_value_t = 10)]
        count: u32,

        /// Payload size in bytes (at least 8)
        #[arg(short, long, default_value_t = 32)]
        size: usize,

        /// Pause between messages
        #[arg(short, long, default_value_t = 100)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let url = ping_url(Url::parse(&cli.url)?, &cli.param, &cli.action);

    match cli.command {
        Commands::Http => probe_http(url).await?,
        Commands::Ws {
            count,
            size,
            interval_ms,
        } => probe_ws(url, count, size.max(8), Duration::from_millis(interval_ms)).await?,
    }

    Ok(())
}

/// `base` with `param` set to `action`, keeping every other query pair.
fn ping_url(mut base: Url, param: &str, action: &str) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    base.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(param, action);
    base
}

async fn probe_http(url: Url) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let res = reqwest::Client::new().get(url).send().await?;
    let elapsed = started.elapsed();

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: ping returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("ping returned status {}", status).into());
    }

    let reply: serde_json::Value = res.json().await?;
    let report = json!({
        "status": status.as_u16(),
        "latency_ms": elapsed.as_secs_f64() * 1000.0,
        "reply": reply,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn probe_ws(
    mut url: Url,
    count: u32,
    size: usize,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme)
        .map_err(|_| format!("cannot probe {} over WebSocket", url))?;

    let (mut stream, _) = connect_async(url.as_str()).await?;

    let mut rtts = Vec::with_capacity(count as usize);
    let mut mismatched = 0u32;

    'frames: for seq in 0..count {
        let mut payload = vec![0xA5u8; size];
        payload[..8].copy_from_slice(&u64::from(seq).to_be_bytes());

        let sent_at = Instant::now();
        if let Err(e) = stream.send(Message::binary(payload.clone())).await {
            eprintln!("Error: send failed: {}", e);
            break;
        }

        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => {
                    if data.as_ref() != payload.as_slice() {
                        mismatched += 1;
                    }
                    rtts.push(sent_at.elapsed());
                    break;
                }
                Some(Ok(Message::Close(_))) | None => {
                    eprintln!("Error: echo channel closed by server");
                    break 'frames;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    break 'frames;
                }
            }
        }

        if seq + 1 < count {
            tokio::time::sleep(interval).await;
        }
    }

    let _ = stream.close(None).await;

    let as_ms = |d: &Duration| d.as_secs_f64() * 1000.0;
    let min = rtts.iter().min().map(as_ms);
    let max = rtts.iter().max().map(as_ms);
    let avg = if rtts.is_empty() {
        None
    } else {
        Some(rtts.iter().map(as_ms).sum::<f64>() / rtts.len() as f64)
    };

    let received = rtts.len() as u32;
    let report = json!({
        "sent": count,
        "received": received,
        "mismatched": mismatched,
        "rtt_ms": { "min": min, "avg": avg, "max": max },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    check_echo(count, received, mismatched)?;
    Ok(())
}

/// Fails when any frame came back altered or never came back.
fn check_echo(sent: u32, received: u32, mismatched: u32) -> Result<(), String> {
    if mismatched > 0 {
        return Err(format!("{mismatched} of {sent} echoes did not match"));
    }
    if received < sent {
        return Err(format!("only {received} of {sent} echoes received"));
    }
    Ok(())
}
