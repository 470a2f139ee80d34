//! HTTP control API
//!
//! Transport agnostic: the embedding firmware reads the request line from its
//! socket, hands the method and target to [`HttpApi::handle`] and writes the
//! returned [`Response`] back.
//!
//! Routes:
//! - `GET /` - control page
//! - `GET /api/state` - current state as JSON
//! - `GET /api/set?brightness=..&temperature=..&on=..&schedule=..&onTime=..&offTime=..`
//!   - apply the given fields, then respond like `/api/state`

use core::fmt::Write;

use heapless::{String, Vec};
use serde::{Serialize, Serializer};

use crate::OutputDriver;
use crate::controller::Controller;
use crate::schedule::{TimeOfDay, UNKNOWN_TIME};
use crate::settings::{Settings, SettingsPatch};
use crate::storage::StorageDriver;

/// Longest query value that is decoded, longer values are ignored
const MAX_VALUE_LEN: usize = 16;

const NOT_FOUND_BODY: &[u8] = br#"{"error":"not_found"}"#;

fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        404 => "Not Found",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// The JSON body does not fit the response buffer
    ResponseTooLarge,
}

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    /// Any method the API does not serve
    Other,
}

impl HttpMethod {
    /// Parse the method token of a request line
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            _ => Self::Other,
        }
    }
}

/// Resolved API route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Index,
    State,
    Set { query: &'a str },
    NotFound,
}

impl<'a> Route<'a> {
    /// Resolve a request target (path with optional query)
    pub fn resolve(method: HttpMethod, target: &'a str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        match (method, path) {
            (HttpMethod::Get, "/") => Self::Index,
            (HttpMethod::Get, "/api/state") => Self::State,
            (HttpMethod::Get, "/api/set") => Self::Set { query },
            _ => Self::NotFound,
        }
    }
}

/// Build a settings patch from an `/api/set` query string
///
/// Unknown keys and unparsable values are skipped, so `brightness=abc` leaves
/// the brightness untouched instead of reading it as `0`. Times must be exactly
/// `H:MM` or `HH:MM`. Numeric values are clamped when the patch is applied,
/// not here.
pub fn parse_query(query: &str) -> SettingsPatch {
    let mut patch = SettingsPatch::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let Some(value) = percent_decode::<MAX_VALUE_LEN>(raw) else {
            continue;
        };
        let value = value.as_str().trim();

        match key {
            "brightness" => patch.brightness = value.parse().ok().or(patch.brightness),
            "temperature" => patch.temperature = value.parse().ok().or(patch.temperature),
            "on" => patch.power = parse_flag(value).or(patch.power),
            "schedule" => patch.schedule_enabled = parse_flag(value).or(patch.schedule_enabled),
            "onTime" => patch.on_time = TimeOfDay::parse(value).ok().or(patch.on_time),
            "offTime" => patch.off_time = TimeOfDay::parse(value).ok().or(patch.off_time),
            _ => {}
        }
    }
    patch
}

/// Any non-zero integer is `true`
fn parse_flag(value: &str) -> Option<bool> {
    value.parse::<i32>().ok().map(|flag| flag != 0)
}

/// Decode a `application/x-www-form-urlencoded` value
///
/// Returns `None` for malformed escapes, invalid UTF-8 or values longer
/// than `N` bytes.
pub fn percent_decode<const N: usize>(raw: &str) -> Option<String<N>> {
    let bytes = raw.as_bytes();
    let mut out = Vec::<u8, N>::new();
    let mut i = 0;
    while i < bytes.len() {
        let byte = match bytes[i] {
            b'+' => b' ',
            b'%' => {
                let high = hex_digit(*bytes.get(i + 1)?)?;
                let low = hex_digit(*bytes.get(i + 2)?)?;
                i += 2;
                (high << 4) | low
            }
            byte => byte,
        };
        out.push(byte).ok()?;
        i += 1;
    }
    String::from_utf8(out).ok()
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Network facts reported next to the light state
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Device IP address as text
    pub ip: &'a str,
    /// Whether the station is associated
    pub wifi_connected: bool,
    /// Local wall clock time, `None` until synchronized
    pub local_time: Option<TimeOfDay>,
}

/// JSON body of `/api/state` and `/api/set`
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse<'a> {
    pub brightness: u8,
    pub temperature: u16,
    pub on: u8,
    pub schedule: u8,
    #[serde(rename = "onTime")]
    pub on_time: TimeOfDay,
    #[serde(rename = "offTime")]
    pub off_time: TimeOfDay,
    pub ip: &'a str,
    pub wifi: &'a str,
    pub time: ClockTime,
}

/// Local time as reported to clients, `--:--` until the clock is synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(pub Option<TimeOfDay>);

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(time) => time.serialize(serializer),
            None => serializer.serialize_str(UNKNOWN_TIME),
        }
    }
}

impl<'a> StateResponse<'a> {
    pub fn new(settings: &Settings, context: &RequestContext<'a>) -> Self {
        Self {
            brightness: settings.brightness,
            temperature: settings.temperature,
            on: u8::from(settings.power),
            schedule: u8::from(settings.schedule.enabled),
            on_time: settings.schedule.on,
            off_time: settings.schedule.off,
            ip: context.ip,
            wifi: if context.wifi_connected {
                "connected"
            } else {
                "disconnected"
            },
            time: ClockTime(context.local_time),
        }
    }
}

/// HTTP Content Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    TextHtml,
}

impl ContentType {
    /// Convert the content type to a string.
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TextHtml => "text/html; charset=utf-8",
        }
    }
}

/// Response status line and headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub status: u16,
    pub content_type: ContentType,
    pub content_length: usize,
}

impl ResponseHeaders {
    /// Write the status line and headers, including the blank line
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\n",
            self.status,
            reason_phrase(self.status)
        )?;
        write!(writer, "Content-Type: {}\r\n", self.content_type.as_str())?;
        write!(writer, "Content-Length: {}\r\n", self.content_length)?;
        write!(writer, "Connection: close\r\n\r\n")
    }
}

/// Response ready to be written to the socket
#[derive(Debug, Clone, Copy)]
pub struct Response<'b> {
    pub headers: ResponseHeaders,
    pub body: &'b [u8],
}

impl<'b> Response<'b> {
    fn new(status: u16, content_type: ContentType, body: &'b [u8]) -> Self {
        Self {
            headers: ResponseHeaders {
                status,
                content_type,
                content_length: body.len(),
            },
            body,
        }
    }
}

/// Request handler of the control API
#[derive(Debug, Clone, Copy)]
pub struct HttpApi {
    /// Control page served at `/`
    pub index_page: &'static [u8],
}

impl HttpApi {
    pub const fn new(index_page: &'static [u8]) -> Self {
        Self { index_page }
    }

    /// Handle one request
    ///
    /// JSON bodies are serialized into `buffer`.
    pub fn handle<'b, O, D, const MAX_LEDS: usize, const INTENTS: usize>(
        &self,
        controller: &mut Controller<'_, O, D, MAX_LEDS, INTENTS>,
        method: HttpMethod,
        target: &str,
        context: &RequestContext<'_>,
        now: embassy_time::Instant,
        buffer: &'b mut [u8],
    ) -> Result<Response<'b>, ApiError>
    where
        O: OutputDriver,
        D: StorageDriver,
    {
        match Route::resolve(method, target) {
            Route::Index => Ok(Response::new(200, ContentType::TextHtml, self.index_page)),
            Route::State => write_state(controller.settings(), context, buffer),
            Route::Set { query } => {
                let patch = parse_query(query);
                let settings = controller.apply_patch(&patch, now);
                write_state(settings, context, buffer)
            }
            Route::NotFound => Ok(Response::new(404, ContentType::Json, NOT_FOUND_BODY)),
        }
    }
}

/// Serialize the state JSON into `buffer`
pub fn write_state<'b>(
    settings: &Settings,
    context: &RequestContext<'_>,
    buffer: &'b mut [u8],
) -> Result<Response<'b>, ApiError> {
    let state = StateResponse::new(settings, context);
    let len =
        serde_json_core::to_slice(&state, buffer).map_err(|_| ApiError::ResponseTooLarge)?;
    Ok(Response::new(200, ContentType::Json, &buffer[..len]))
}
