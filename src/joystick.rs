// Joystick position source
//
// The joystick server renders a status page with an HTML comment of the form
// `<!-- Machine <x> <y> -->`. We fetch the page and pull the first two numbers
// out of that comment.

use std::future::Future;

use tracing::debug;

use crate::config::HTTP_TIMEOUT;
use crate::messages::JoystickSample;

const TAG_START: &str = "<!-- Machine";
const TAG_END: &str = "-->";

/// Errors while fetching or parsing the joystick position
#[derive(Debug, thiserror::Error)]
pub enum JoystickError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Joystick server returned HTTP {status}")]
    Status { status: u16 },

    #[error("No <!-- Machine ... --> tag in joystick page")]
    MissingMachineTag,

    #[error("Machine tag holds {found} number(s), expected 2")]
    MissingNumbers { found: usize },

    #[error("Invalid number {token:?} in machine tag")]
    InvalidNumber { token: String },
}

pub type Result<T> = std::result::Result<T, JoystickError>;

/// Anything that can hand back the raw joystick status page
pub trait JoystickSource {
    fn fetch_raw(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Joystick source backed by a real HTTP server
pub struct HttpJoystick {
    client: reqwest::Client,
}

impl HttpJoystick {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

impl JoystickSource for HttpJoystick {
    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(JoystickError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Fetch the page and extract the joystick position from it
pub async fn fetch_sample<S: JoystickSource>(source: &S, url: &str) -> Result<JoystickSample> {
    let html = source.fetch_raw(url).await?;
    let sample = extract_sample(&html)?;
    debug!("Joystick sample: x={}, y={}", sample.x, sample.y);
    Ok(sample)
}

/// Pull (x, y) out of the first machine tag in `html`
pub fn extract_sample(html: &str) -> Result<JoystickSample> {
    let start = html.find(TAG_START).ok_or(JoystickError::MissingMachineTag)?;
    let body = &html[start + TAG_START.len()..];
    let end = body.find(TAG_END).ok_or(JoystickError::MissingMachineTag)?;
    let tag = &body[..end];

    let tokens: Vec<&str> = numeric_tokens(tag).take(2).collect();
    if tokens.len() < 2 {
        return Err(JoystickError::MissingNumbers {
            found: tokens.len(),
        });
    }

    Ok(JoystickSample::new(
        parse_number(tokens[0])?,
        parse_number(tokens[1])?,
    ))
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

/// Non-empty runs of digits, '.' and '-' that follow a space or '='
///
/// A run such as "-" or "--" is still a token; it fails to parse later.
fn numeric_tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        loop {
            let delim = rest.find([' ', '='])?;
            let after = &rest[delim + 1..];
            let len = after.find(|c: char| !is_number_char(c)).unwrap_or(after.len());
            let token = &after[..len];
            rest = &after[len..];
            if !token.is_empty() {
                return Some(token);
            }
        }
    })
}

fn parse_number(token: &str) -> Result<f64> {
    token.parse().map_err(|_| JoystickError::InvalidNumber {
        token: token.to_string(),
    })
}
