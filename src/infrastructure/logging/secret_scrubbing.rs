//! Redaction of credentials in log output.

use regex::{Captures, Regex};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Regex-based redactor for platform keys, bearer tokens and token fields.
#[derive(Debug, Clone)]
pub struct SecretScrubber {
    platform_key: Regex,
    bearer: Regex,
    token_field: Regex,
}

impl SecretScrubber {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Calling platform keys: API_<base64url>
            platform_key: Regex::new(r"\bAPI_[A-Za-z0-9_-]{16,}")?,
            bearer: Regex::new(r"Bearer\s+[A-Za-z0-9\-_\.=]+")?,
            token_field: Regex::new(
                r#"(["']?(?:api_key|apikey|token|secret)["']?\s*[:=]\s*)["']?[A-Za-z0-9\-_\.]{12,}["']?"#,
            )?,
        })
    }

    pub fn scrub(&self, message: &str) -> String {
        let scrubbed = self.bearer.replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = self.platform_key.replace_all(&scrubbed, "[API_KEY_REDACTED]");
        self.token_field
            .replace_all(&scrubbed, |caps: &Captures| format!("{}[REDACTED]", &caps[1]))
            .into_owned()
    }
}

fn global() -> Option<&'static SecretScrubber> {
    static SCRUBBER: OnceLock<Option<SecretScrubber>> = OnceLock::new();
    SCRUBBER.get_or_init(|| SecretScrubber::new().ok()).as_ref()
}

/// Scrub `message` with the shared scrubber.
pub fn scrub_secrets(message: &str) -> String {
    match global() {
        Some(scrubber) => scrubber.scrub(message),
        None => message.to_string(),
    }
}

/// Loggable form of a token: a short prefix, never the whole value.
pub fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return "<unset>".to_string();
    }
    if token.chars().count() <= 8 {
        return "[REDACTED]".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...[REDACTED]")
}

/// `MakeWriter` that scrubs every formatted event before it reaches `inner`.
#[derive(Debug, Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
}

impl<M> ScrubbingMakeWriter<M> {
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct ScrubbingWriter<W> {
    inner: W,
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(scrub_secrets(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for ScrubbingMakeWriter<M> {
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
        }
    }
}
