//! SSE wire convention shared by the relay server and its clients.
//!
//! Every delta travels as one SSE `message` event whose data is the delta
//! text wrapped in literal `"` characters:
//!
//! ```text
//! data: "Hel"
//!
//! data: "lo"
//! ```
//!
//! The client strips exactly one leading and one trailing quote.  Line breaks
//! inside a delta are carried by regular multi-line `data:` framing, which
//! SSE parsers join back with `\n`.  SSE cannot transport a bare carriage
//! return, so `\r\n` and `\r` are normalised to `\n` before framing.
//!
//! Two optional named events mark the end of a session.  Because they are
//! not `message` events, a browser `EventSource.onmessage` handler never sees
//! them.

/// Event name of a delta frame (the SSE default).
pub const MESSAGE_EVENT: &str = "message";
/// Event name of the optional normal-completion frame.
pub const DONE_EVENT: &str = "done";
/// Event name of the optional failure frame.
pub const ERROR_EVENT: &str = "error";
/// Data carried by the [`DONE_EVENT`] frame.
pub const DONE_DATA: &str = "[DONE]";

const QUOTE: char = '"';

/// Wrap a delta for transmission.
pub fn quote_delta(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(QUOTE);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out.push(QUOTE);
    out
}

/// Undo [`quote_delta`]: drop one leading and one trailing `"` when present.
///
/// Payloads without quotes are returned unchanged so a client also copes
/// with relays that send raw text.
pub fn unquote_delta(data: &str) -> &str {
    let data = data.strip_prefix(QUOTE).unwrap_or(data);
    data.strip_suffix(QUOTE).unwrap_or(data)
}
