use clap::Parser;
use minidis::{server, Error};
use std::path::PathBuf;

const PORT: u16 = 6379;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = PORT)]
    port: u16,

    /// Path of the append-only file used for persistence
    #[arg(short, long, default_value = "database.aof")]
    aof: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(args.port, args.aof).await
}
