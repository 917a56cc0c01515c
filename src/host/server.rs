use super::protocol::{
    CodeBody, Message, MessageContent, MethodsBody, PathArguments, RangeArguments, TextBody,
    DISCONNECT, GET_PHASE_TEXT, LOAD, LOADED_EVENT, LOAD_HYDROGEN_LOG,
};
use crate::hydrogen::{self, HydrogenLog, Loaded};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Read, Write};

const CONTENT_LENGTH: &str = "Content-Length:";

/// Largest message body accepted from a client.
pub const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// Serves load and phase-text requests over `Content-Length` framed JSON.
pub struct HostServer<R, W> {
    seq: u64,
    reader: R,
    writer: W,
    log: Option<HydrogenLog>,
}

impl<R: BufRead, W: Write> HostServer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
            log: None,
        }
    }

    pub fn log(&self) -> Option<&HydrogenLog> {
        self.log.as_ref()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Serve requests until `disconnect` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let mut msg_count = 0u64;
        loop {
            msg_count += 1;
            log::trace!("waiting for message #{}", msg_count);

            let msg = match self.read_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    log::info!("input closed");
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    log::warn!("dropping malformed message: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            log::debug!("received #{}: {:?}", msg_count, msg.content);
            if !self.handle(msg)? {
                return Ok(());
            }
        }
    }

    /// Dispatch one message. Returns `false` once the client disconnects.
    pub fn handle(&mut self, msg: Message) -> io::Result<bool> {
        let MessageContent::Request { command, arguments } = msg.content else {
            log::debug!("ignoring non-request message");
            return Ok(true);
        };

        match command.as_str() {
            LOAD_HYDROGEN_LOG => self.handle_load_hydrogen_log(msg.seq, command, arguments)?,
            GET_PHASE_TEXT => self.handle_get_phase_text(msg.seq, command, arguments)?,
            LOAD => self.handle_load(msg.seq, command, arguments)?,
            DISCONNECT => {
                self.send_response(msg.seq, command, true, None)?;
                return Ok(false);
            }
            _ => {
                log::warn!("unhandled command: {}", command);
                let message = format!("unknown command: {}", command);
                self.send_error(msg.seq, command, message)?;
            }
        }
        Ok(true)
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        body: Option<Value>,
    ) -> io::Result<()> {
        self.respond(request_seq, command, success, None, body)
    }

    pub fn send_error(
        &mut self,
        request_seq: u64,
        command: String,
        message: String,
    ) -> io::Result<()> {
        log::warn!("{} failed: {}", command, message);
        self.respond(request_seq, command, false, Some(message), None)
    }

    fn respond(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> io::Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: String, body: Option<Value>) -> io::Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: MessageContent::Event { event, body },
        };
        self.send_message(&msg)
    }

    fn send_message(&mut self, msg: &Message) -> io::Result<()> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "{} {}\r\n\r\n{}", CONTENT_LENGTH, json.len(), json)?;
        self.writer.flush()?;
        log::trace!("sent {} bytes", json.len());
        Ok(())
    }

    /// Read one framed message. `Ok(None)` means the input is exhausted.
    pub fn read_message(&mut self) -> io::Result<Option<Message>> {
        let mut content_length = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.is_empty() {
                if saw_header {
                    break;
                }
                continue;
            }
            saw_header = true;
            if let Some(value) = line.strip_prefix(CONTENT_LENGTH) {
                content_length = value.trim().parse::<usize>().ok();
            }
        }

        let content_length = content_length.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "missing Content-Length header")
        })?;
        if content_length > MAX_CONTENT_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Content-Length {} exceeds {}", content_length, MAX_CONTENT_LENGTH),
            ));
        }

        let mut buffer = vec![0u8; content_length];
        self.reader.read_exact(&mut buffer)?;
        let msg = serde_json::from_slice(&buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(msg))
    }

    fn handle_load_hydrogen_log(
        &mut self,
        seq: u64,
        command: String,
        args: Option<Value>,
    ) -> io::Result<()> {
        let args: PathArguments = match arguments(args) {
            Ok(args) => args,
            Err(message) => return self.send_error(seq, command, message),
        };

        match HydrogenLog::load(&args.path) {
            Ok(log) => self.accept_log(seq, command, args.path, log),
            Err(e) => self.send_error(seq, command, format!("{}: {}", args.path, e)),
        }
    }

    fn handle_get_phase_text(
        &mut self,
        seq: u64,
        command: String,
        args: Option<Value>,
    ) -> io::Result<()> {
        let args: RangeArguments = match arguments(args) {
            Ok(args) => args,
            Err(message) => return self.send_error(seq, command, message),
        };

        let Some(log) = &self.log else {
            return self.send_error(seq, command, "no hydrogen log loaded".to_string());
        };

        match log.phase_text(args.start_line, args.end_line) {
            Ok(text) => {
                let body = to_body(&TextBody { text })?;
                self.send_response(seq, command, true, Some(body))
            }
            Err(e) => self.send_error(seq, command, e.to_string()),
        }
    }

    fn handle_load(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let args: PathArguments = match arguments(args) {
            Ok(args) => args,
            Err(message) => return self.send_error(seq, command, message),
        };

        match hydrogen::load(&args.path) {
            Ok(Loaded::Log(log)) => self.accept_log(seq, command, args.path, log),
            Ok(Loaded::Code(code)) => {
                let body = to_body(&CodeBody { code })?;
                self.send_response(seq, command, true, Some(body))
            }
            Err(e) => self.send_error(seq, command, format!("{}: {}", args.path, e)),
        }
    }

    fn accept_log(
        &mut self,
        seq: u64,
        command: String,
        path: String,
        log: HydrogenLog,
    ) -> io::Result<()> {
        let body = to_body(&MethodsBody {
            methods: log.methods(),
        })?;
        let count = log.methods().len();
        self.log = Some(log);

        self.send_response(seq, command, true, Some(body))?;
        self.send_event(
            LOADED_EVENT.to_string(),
            Some(json!({ "path": path, "methods": count })),
        )
    }
}

fn arguments<T: DeserializeOwned>(args: Option<Value>) -> Result<T, String> {
    let args = args.ok_or_else(|| "missing arguments".to_string())?;
    serde_json::from_value(args).map_err(|e| format!("invalid arguments: {}", e))
}

fn to_body<T: Serialize>(body: &T) -> io::Result<Value> {
    Ok(serde_json::to_value(body)?)
}
