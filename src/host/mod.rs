mod protocol;
mod server;

use std::io;

pub use protocol::{
    Message, MessageContent, DISCONNECT, GET_PHASE_TEXT, LOAD, LOADED_EVENT, LOAD_HYDROGEN_LOG,
};
pub use server::{HostServer, MAX_CONTENT_LENGTH};

/// Serve host requests on stdin/stdout until the client disconnects.
pub fn run_server_mode() -> io::Result<()> {
    log::info!("host server starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = HostServer::new(stdin.lock(), stdout.lock());
    server.run()?;

    log::info!("host server exiting");
    Ok(())
}
