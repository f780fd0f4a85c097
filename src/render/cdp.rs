//! Chrome DevTools protocol over a blocking WebSocket.
//!
//! Commands are answered in the order the browser chooses, interleaved with
//! events. Events read while waiting for a response are queued and handed
//! out by [`Connection::wait_event`].

use super::RenderError;
use crate::debug;
use serde_json::{Value, json};
use std::{collections::VecDeque, net::TcpStream};
use tungstenite::{Message, WebSocket, stream::MaybeTlsStream};

/// An unsolicited protocol event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub method: String,
    pub params: Value,
    pub session_id: Option<String>,
}

/// One decoded protocol message.
#[derive(Debug, PartialEq)]
enum Incoming {
    Response {
        id: u64,
        result: Result<Value, String>,
    },
    Event(Event),
}

impl Incoming {
    fn parse(text: &str) -> Result<Self, RenderError> {
        let mut message: Value =
            serde_json::from_str(text).map_err(|e| RenderError::Malformed(e.to_string()))?;

        if let Some(id) = message.get("id").and_then(Value::as_u64) {
            let result = match message.get("error") {
                Some(error) => Err(error
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| error.to_string(), str::to_owned)),
                None => Ok(message.get_mut("result").map(Value::take).unwrap_or(Value::Null)),
            };
            return Ok(Self::Response { id, result });
        }

        let method = message
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| RenderError::Malformed(text.chars().take(200).collect()))?
            .to_owned();
        Ok(Self::Event(Event {
            method,
            params: message.get_mut("params").map(Value::take).unwrap_or(Value::Null),
            session_id: message
                .get("sessionId")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }))
    }
}

/// Build a command message.
fn command(id: u64, method: &str, params: Value, session: Option<&str>) -> Value {
    let mut message = json!({ "id": id, "method": method, "params": params });
    if let Some(session) = session {
        message["sessionId"] = Value::from(session);
    }
    message
}

/// A DevTools connection to the browser endpoint.
pub struct Connection {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    next_id: u64,
    events: VecDeque<Event>,
}

impl Connection {
    pub fn connect(url: &str) -> Result<Self, RenderError> {
        let (socket, _) = tungstenite::connect(url)?;
        Ok(Self {
            socket,
            next_id: 1,
            events: VecDeque::new(),
        })
    }

    /// Send a command and block until its response arrives.
    ///
    /// `session` targets a page attached with `flatten: true`; `None` talks to
    /// the browser itself.
    pub fn call(
        &mut self,
        method: &str,
        params: Value,
        session: Option<&str>,
    ) -> Result<Value, RenderError> {
        let id = self.next_id;
        self.next_id += 1;

        let message = command(id, method, params, session);
        debug!("cdp"; "-> {method} #{id}");
        self.socket.send(Message::Text(message.to_string().into()))?;

        loop {
            match self.read()? {
                Incoming::Response { id: got, result } if got == id => {
                    return result.map_err(|message| RenderError::Protocol {
                        method: method.to_owned(),
                        message,
                    });
                }
                Incoming::Response { .. } => {}
                Incoming::Event(event) => self.events.push_back(event),
            }
        }
    }

    /// Block until an event matching `matches` arrives, including events
    /// already queued. Non-matching events stay queued.
    pub fn wait_event(
        &mut self,
        mut matches: impl FnMut(&Event) -> bool,
    ) -> Result<Event, RenderError> {
        if let Some(pos) = self.events.iter().position(&mut matches)
            && let Some(event) = self.events.remove(pos)
        {
            return Ok(event);
        }

        loop {
            match self.read()? {
                Incoming::Event(event) if matches(&event) => return Ok(event),
                Incoming::Event(event) => self.events.push_back(event),
                Incoming::Response { .. } => {}
            }
        }
    }

    /// Drop queued events for a session that is going away.
    pub fn forget_session(&mut self, session: &str) {
        self.events
            .retain(|event| event.session_id.as_deref() != Some(session));
    }

    fn read(&mut self) -> Result<Incoming, RenderError> {
        loop {
            match self.socket.read()? {
                Message::Text(text) => return Incoming::parse(text.as_str()),
                Message::Close(_) => return Err(RenderError::Closed),
                _ => {}
            }
        }
    }

    /// Close the WebSocket, ignoring a peer that is already gone.
    pub fn close(&mut self) {
        let _ = self.socket.close(None);
        let _ = self.socket.flush();
    }
}
