use std::net::SocketAddr;
use std::path::Path;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::aof::Aof;
use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

pub async fn run(port: u16, aof_path: impl AsRef<Path>) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let store = Store::new();
    let aof = Aof::open(aof_path)?;

    // Rebuild the in-memory state before accepting any traffic. Replayed
    // commands go through the normal dispatch path with the log disabled, so
    // they are not appended a second time.
    let mut replayed = 0usize;
    aof.replay(|frame| {
        if let Frame::Error(err) = dispatch(frame, &store, None) {
            warn!("replayed command failed: {}", err);
        }
        replayed += 1;
    })?;
    info!("Replayed {} commands from the append-only file", replayed);

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let store = store.clone();
        let aof = aof.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, store, aof).await {
                error!("connection error: {}", e);
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, store, aof),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    aof: Aof,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(frame) = conn.read_frame().await? {
        debug!("Received frame from client: {:?}", frame);
        let reply = dispatch(frame, &store, Some(&aof));
        debug!("Sending response to client: {:?}", reply);

        conn.write_frame(&reply).await?;
    }

    info!("Connection closed");
    Ok(())
}

/// The single dispatch entry point, shared by live connections and startup
/// replay (replay passes `None` for the log). Always produces exactly one
/// reply frame; command-level failures become error replies, never
/// connection-terminating errors.
pub fn dispatch(frame: Frame, store: &Store, aof: Option<&Aof>) -> Frame {
    let request = frame.clone();

    let cmd = match Command::try_from(frame) {
        Ok(cmd) => cmd,
        Err(err) => return Frame::Error(format!("ERR {}", err)),
    };

    // Mutating commands are logged before the mutation is applied. If the
    // append fails the client gets an error and the store stays untouched,
    // so no applied or acknowledged mutation is ever missing from the log.
    if cmd.is_mutating() {
        if let Some(aof) = aof {
            if let Err(err) = aof.append(&request.serialize()) {
                error!("failed to append to the append-only file: {}", err);
                return Frame::Error(format!("ERR {}", err));
            }
        }
    }

    match cmd.exec(store.clone()) {
        Ok(reply) => reply,
        Err(err) => Frame::Error(format!("ERR {}", err)),
    }
}
