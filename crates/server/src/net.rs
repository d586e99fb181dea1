use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::hub::Hub;

/// Bind failure here is fatal at startup; everything after it is
/// recoverable per connection.
pub fn bind_listener(addr: &str, backlog: u32) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = addr.parse()?;
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    Ok(socket.listen(backlog)?)
}

pub async fn run_acceptor(
    listener: TcpListener,
    hub: Arc<Hub>,
    read_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, "subscriber connected");
                    tokio::spawn(serve_subscriber(
                        stream,
                        peer,
                        Arc::clone(&hub),
                        read_timeout,
                        shutdown.clone(),
                    ));
                }
                Err(error) => warn!(%error, "accept failed"),
            },
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        if *shutdown.borrow() {
            break;
        }
    }
}

/// One task per subscriber: drains the hub queue onto the socket and reads
/// with a bounded timeout for liveness, re-checking shutdown after every
/// timeout. Any read or write failure drops only this subscriber.
async fn serve_subscriber(
    stream: TcpStream,
    peer: SocketAddr,
    hub: Arc<Hub>,
    read_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let (id, mut lines) = hub.subscribe();
    let (mut reader, mut writer) = stream.into_split();
    let mut scratch = [0u8; 1024];

    loop {
        tokio::select! {
            queued = lines.recv() => {
                let Some(line) = queued else { break };
                if let Err(error) = writer.write_all(line.as_bytes()).await {
                    warn!(%peer, %error, "write failed");
                    break;
                }
            }
            read = timeout(read_timeout, reader.read(&mut scratch)) => {
                match read {
                    Ok(Ok(0)) => break,
                    Ok(Ok(_)) => {} // inbound bytes are ignored; liveness only
                    Ok(Err(error)) => {
                        warn!(%peer, %error, "read failed");
                        break;
                    }
                    Err(_) => {} // timed out; fall through to the shutdown check
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        if *shutdown.borrow() {
            break;
        }
    }

    hub.unsubscribe(id);
    info!(%peer, "subscriber disconnected");
}

#[cfg(test)]
#[path = "tests/net_tests.rs"]
mod tests;
