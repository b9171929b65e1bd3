//! Structured parsing of the web-view callback URL
//!
//! The platform hands back a URL whose fragment carries a `tgWebAppData`
//! parameter: an URL-encoded query string holding the signed auth fields.
//! Each expected field is extracted by name; a missing field is an explicit
//! error, never a silently shifted split.

use tapmill_core::{AuthPayload, Result, TapError};
use url::{form_urlencoded, Url};

/// Parse the signed auth payload out of a web-view callback URL.
///
/// Looks for `tgWebAppData` in the URL fragment first (where the platform
/// puts it), then in the query string.
pub fn parse_callback_url(callback: &str) -> Result<AuthPayload> {
    let url = Url::parse(callback)
        .map_err(|e| TapError::AuthPayload(format!("malformed callback URL: {}", e)))?;

    let raw = url
        .fragment()
        .and_then(|f| find_param(f, "tgWebAppData"))
        .or_else(|| url.query().and_then(|q| find_param(q, "tgWebAppData")))
        .ok_or_else(|| {
            TapError::AuthPayload("callback URL has no tgWebAppData parameter".to_string())
        })?;

    parse_web_app_data(&raw)
}

/// Parse the inner `tgWebAppData` query string into an [`AuthPayload`]
pub fn parse_web_app_data(data: &str) -> Result<AuthPayload> {
    let mut query_id = None;
    let mut user = None;
    let mut auth_date = None;
    let mut signature = None;
    let mut hash = None;

    for (key, value) in form_urlencoded::parse(data.as_bytes()) {
        match key.as_ref() {
            "query_id" => query_id = Some(value.into_owned()),
            "user" => user = Some(value.into_owned()),
            "auth_date" => auth_date = Some(value.into_owned()),
            "signature" => signature = Some(value.into_owned()),
            "hash" => hash = Some(value.into_owned()),
            _ => {}
        }
    }

    let auth_date = required(auth_date, "auth_date")?;
    let auth_date = auth_date.parse::<i64>().map_err(|_| {
        TapError::AuthPayload(format!("auth_date is not a unix timestamp: {}", auth_date))
    })?;

    Ok(AuthPayload {
        query_id: required(query_id, "query_id")?,
        user: required(user, "user")?,
        auth_date,
        signature: required(signature, "signature")?,
        hash: required(hash, "hash")?,
    })
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| TapError::AuthPayload(format!("missing field `{}` in web-app data", name)))
}

fn find_param(encoded: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.into_owned())
}
