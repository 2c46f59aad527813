//! Simple client that sends framed messages to a Framelink server and
//! prints the replies.
//!
//! Run the server first:
//! - cargo run -p framelink --example server -- 127.0.0.1:7777
//!
//! Then run the client:
//! - cargo run -p framelink --example client -- 127.0.0.1:7777
//! - cargo run -p framelink --example client -- 127.0.0.1:7777 10 200
//!   (sends 10 messages, 200ms apart)

use std::{
    env,
    net::{SocketAddr, TcpStream},
    thread,
    time::{Duration, Instant},
};

use framelink::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Args: <server_addr> [count] [interval_ms]
    let mut args = env::args().skip(1);
    let server_addr: SocketAddr = args
        .next()
        .unwrap_or_else(|| "127.0.0.1:9000".to_string())
        .parse()?;
    let count: usize = args.next().unwrap_or_else(|| "5".into()).parse().unwrap_or(5);
    let interval_ms: u64 = args
        .next()
        .unwrap_or_else(|| "300".into())
        .parse()
        .unwrap_or(300);

    let stream = TcpStream::connect(server_addr)?;
    stream.set_nonblocking(true)?;
    let local = stream.local_addr()?;
    println!(
        "Framelink client bound to {} -> sending {} messages to {} (every {}ms)",
        local, count, server_addr, interval_ms
    );

    let mut conn = Connection::with_default_policy(stream, Config::default())?;
    conn.set_writable(true);

    for i in 0..count {
        let msg = format!("hello {} from {}", i, local);
        conn.enqueue(msg.as_bytes())?;

        let start = Instant::now();
        let wait = Duration::from_millis(interval_ms);

        while start.elapsed() < wait {
            if let Flushed::Closed(status) = conn.flush() {
                println!("[disconnect] ({:?})", status);
                return Ok(());
            }

            loop {
                match conn.receive() {
                    Received::Frame(frame) => {
                        let text = String::from_utf8_lossy(frame.payload());
                        println!("[reply] len={} payload=\"{}\"", frame.payload().len(), text);
                    }
                    Received::Pending => break,
                    Received::Closed(status) => {
                        println!("[disconnect] ({:?})", status);
                        return Ok(());
                    }
                }
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    conn.close(CloseCause::Local);
    println!("done");
    Ok(())
}
