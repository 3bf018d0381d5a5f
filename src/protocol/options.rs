//! CONNECT header overrides.
//!
//! Each option mutates the outgoing CONNECT headers after the defaults are
//! in place. Options run in the order given, so a later option wins over an
//! earlier one touching the same header.

use super::heartbeat::HeartBeat;
use super::{HDR_ACCEPT_VERSION, HDR_HEART_BEAT, HDR_HOST, HDR_LOGIN, HDR_PASSCODE};
use crate::codec::Headers;

/// A single CONNECT header mutation.
pub type HeaderOption = Box<dyn FnOnce(&mut Headers) + Send>;

/// Wrap an arbitrary header mutation.
pub fn with<F>(f: F) -> HeaderOption
where
    F: FnOnce(&mut Headers) + Send + 'static,
{
    Box::new(f)
}

/// Set any header.
pub fn header(key: impl Into<String>, value: impl Into<String>) -> HeaderOption {
    let (key, value) = (key.into(), value.into());
    Box::new(move |headers: &mut Headers| headers.set(key, value))
}

/// Authenticate with `login` and `passcode`.
pub fn login(login: impl Into<String>, passcode: impl Into<String>) -> HeaderOption {
    let (login, passcode) = (login.into(), passcode.into());
    Box::new(move |headers: &mut Headers| {
        headers.set(HDR_LOGIN, login);
        headers.set(HDR_PASSCODE, passcode);
    })
}

/// Override the virtual host derived from the remote address.
pub fn host(host: impl Into<String>) -> HeaderOption {
    header(HDR_HOST, host)
}

/// Override the advertised protocol versions.
pub fn accept_version(versions: impl Into<String>) -> HeaderOption {
    header(HDR_ACCEPT_VERSION, versions)
}

/// Request heart-beat intervals.
pub fn heart_beat(heart_beat: HeartBeat) -> HeaderOption {
    header(HDR_HEART_BEAT, heart_beat.to_string())
}

/// Apply options in order.
pub(crate) fn apply<I>(headers: &mut Headers, options: I)
where
    I: IntoIterator<Item = HeaderOption>,
{
    for option in options {
        option(headers);
    }
}
