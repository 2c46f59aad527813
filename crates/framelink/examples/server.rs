//! Simple echo server using Framelink.
//!
//! Run:
//! - cargo run -p framelink --example server
//! - cargo run -p framelink --example server -- 127.0.0.1:7777

use std::{
    env,
    net::{SocketAddr, TcpListener},
    thread,
    time::Duration,
};

use framelink::prelude::*;

fn parse_bind_addr() -> Option<SocketAddr> {
    let mut args = env::args().skip(1);
    args.next().and_then(|s| s.parse().ok())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = parse_bind_addr().unwrap_or_else(|| "127.0.0.1:9000".parse().unwrap());
    let listener = TcpListener::bind(bind_addr)?;
    println!("Framelink echo server listening on {}", listener.local_addr()?);
    println!("Send from the client example to this address to see echoes.");

    loop {
        let (stream, peer) = listener.accept()?;
        stream.set_nonblocking(true)?;
        println!("[connect] {}", peer);

        let mut conn = Connection::with_default_policy(stream, Config::default())?;
        // This loop never stops wanting to write, so writability is pinned
        // on; a full OS buffer surfaces as Flushed::Blocked instead.
        conn.set_writable(true);

        'session: loop {
            loop {
                match conn.receive() {
                    Received::Frame(frame) => {
                        let text = String::from_utf8_lossy(frame.payload());
                        println!("[frame] from={} len={} payload=\"{}\"", peer, frame.payload().len(), text);

                        // Echo the payload straight back
                        if let Err(e) = conn.enqueue(frame.payload()) {
                            eprintln!("failed to queue echo: {}", e);
                        }
                    }
                    Received::Pending => break,
                    Received::Closed(status) => {
                        println!("[disconnect] {} ({:?})", peer, status);
                        break 'session;
                    }
                }
            }

            if let Flushed::Closed(status) = conn.flush() {
                println!("[disconnect] {} ({:?})", peer, status);
                break 'session;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}
