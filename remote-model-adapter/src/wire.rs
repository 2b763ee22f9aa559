use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use remote_model::{Outcome, Response, RowRange, TransportError, TransportErrorKind};
use serde::Deserialize;
use serde_json::Value;

use crate::JsonRecord;

/// Response body as sent by the server: `{ from, to, total, records, ...extra }`.
///
/// An empty object is a valid body that carries no rows.
#[derive(Debug, Deserialize)]
struct WireResponse {
    from: Option<usize>,
    to: Option<usize>,
    total: Option<usize>,
    #[serde(default)]
    records: Vec<JsonRecord>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

fn parse_error(detail: impl Into<String>) -> TransportError {
    TransportError::new(TransportErrorKind::Parse, None, detail)
}

/// Decodes a JSON response body.
///
/// Fails with a `Parse` transport error when the body is not a JSON object of the expected
/// shape; the error detail carries the raw body so hosts can inspect it.
///
/// The row range never extends past the supplied records: trailing rows a server declares but
/// does not send are left to the next fetch instead of being unset.
pub fn decode_response(body: &str) -> Result<Response<JsonRecord>, TransportError> {
    let wire: WireResponse = serde_json::from_str(body).map_err(|_| parse_error(body))?;

    let extra = wire
        .extra
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect();

    let Some(from) = wire.from else {
        return Ok(Response {
            extra,
            ..Response::empty()
        });
    };
    let Some(end) = from.checked_add(wire.records.len()) else {
        return Err(parse_error(body));
    };
    let to = wire.to.unwrap_or(end);
    if to < from {
        return Err(parse_error(body));
    }
    let to = to.min(end);
    let Some(total) = wire.total else {
        return Err(parse_error(body));
    };

    Ok(Response {
        range: Some(RowRange::new(from, to)),
        total,
        records: wire.records,
        extra,
    })
}

/// Maps an HTTP reply to a request outcome: error statuses become `Http` failures, everything
/// else is decoded as a response body.
pub fn decode_reply(status: u16, body: &str) -> Outcome<JsonRecord> {
    if status >= 400 {
        return Outcome::Failure(TransportError::new(
            TransportErrorKind::Http,
            Some(status),
            body,
        ));
    }
    match decode_response(body) {
        Ok(response) => Outcome::Success(response),
        Err(mut err) => {
            err.status = Some(status);
            Outcome::Failure(err)
        }
    }
}

/// Request parameters as an `application/x-www-form-urlencoded` query string, in key order.
pub fn query_pairs(params: &BTreeMap<String, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Request parameters as a flat JSON object, for hosts that post JSON bodies.
pub fn params_to_json(params: &BTreeMap<String, String>) -> Value {
    Value::Object(
        params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
