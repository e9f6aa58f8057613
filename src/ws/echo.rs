//! Echo framing.
//!
//! The reply to a data message is always a text frame of the form
//! `"echo: " + text`, where `text` is the payload's textual form:
//!
//! - text frames contribute their content unchanged;
//! - binary frames are decoded as UTF-8, with each invalid sequence
//!   replaced by U+FFFD.
//!
//! Control frames produce no echo. The reply depends only on the message
//! it answers.

use std::borrow::Cow;

use axum::extract::ws::Message;

/// Literal prefix of every echo.
pub const ECHO_PREFIX: &str = "echo: ";

/// Returns the textual form of a data message, or `None` for control frames.
#[must_use]
pub fn payload_text(message: &Message) -> Option<Cow<'_, str>> {
    match message {
        Message::Text(text) => Some(Cow::Borrowed(text.as_str())),
        Message::Binary(bytes) => Some(String::from_utf8_lossy(bytes)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
    }
}

/// Prefixes `payload` with [`ECHO_PREFIX`].
#[must_use]
pub fn echo_text(payload: &str) -> String {
    let mut out = String::with_capacity(ECHO_PREFIX.len() + payload.len());
    out.push_str(ECHO_PREFIX);
    out.push_str(payload);
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Bytes;
    use axum::extract::ws::{CloseFrame, Utf8Bytes, close_code};

    use super::*;

    fn reply_text(message: &Message) -> String {
        let Some(payload) = payload_text(message) else {
            panic!("expected a data message, got {message:?}");
        };
        echo_text(&payload)
    }

    #[test]
    fn text_is_prefixed() {
        assert_eq!(reply_text(&Message::text("hello")), "echo: hello");
    }

    #[test]
    fn same_input_gives_same_echo() {
        let msg = Message::text("hello");
        assert_eq!(reply_text(&msg), reply_text(&msg));
    }

    #[test]
    fn empty_text_yields_bare_prefix() {
        assert_eq!(reply_text(&Message::text("")), "echo: ");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(reply_text(&Message::text("héllo ✓")), "echo: héllo ✓");
    }

    #[test]
    fn binary_utf8_is_answered_as_text() {
        assert_eq!(reply_text(&Message::binary(b"hi".to_vec())), "echo: hi");
    }

    #[test]
    fn invalid_utf8_uses_replacement_character() {
        let reply = reply_text(&Message::binary(vec![b'a', 0xff, b'b']));
        assert_eq!(reply, "echo: a\u{fffd}b");
    }

    #[test]
    fn control_frames_are_not_echoed() {
        assert!(payload_text(&Message::Ping(Bytes::from_static(&[1, 2]))).is_none());
        assert!(payload_text(&Message::Pong(Bytes::new())).is_none());
        assert!(payload_text(&Message::Close(None)).is_none());
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: Utf8Bytes::from_static("bye"),
        };
        assert!(payload_text(&Message::Close(Some(frame))).is_none());
    }

    #[test]
    fn echo_text_concatenates() {
        assert_eq!(echo_text("ping"), "echo: ping");
    }
}
