//! The `{data, err}` response envelope every command resolves to.
//!
//! Internally an envelope is just a `Result`, so the "exactly one side is
//! populated" rule holds by construction. The wire form is an object with
//! both keys present and one of them `null`.

use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Error;

/// Outcome of one command, serialized as `{"data": T, "err": null}` or
/// `{"data": null, "err": {...}}`.
///
/// # Examples
/// ```
/// use backoffice::domain::{Envelope, Error};
/// use serde_json::json;
///
/// let ok: Envelope<u32> = Envelope::ok(7);
/// assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "data": 7, "err": null }));
///
/// let failed: Envelope<u32> = Envelope::err(Error::not_found("missing"));
/// assert!(failed.error().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T>(Result<T, Error>);

impl<T> Envelope<T> {
    /// Wrap a successful result.
    pub fn ok(data: T) -> Self {
        Self(Ok(data))
    }

    /// Wrap a failure.
    pub fn err(error: Error) -> Self {
        Self(Err(error))
    }

    /// Borrow the success payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.0.as_ref().ok()
    }

    /// Borrow the failure, if any.
    pub fn error(&self) -> Option<&Error> {
        self.0.as_ref().err()
    }

    /// Unwrap into a plain `Result`.
    pub fn into_result(self) -> Result<T, Error> {
        self.0
    }

    /// Convert the success payload, keeping failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope(self.0.map(f))
    }
}

impl<T> From<Result<T, Error>> for Envelope<T> {
    fn from(value: Result<T, Error>) -> Self {
        Self(value)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match &self.0 {
            Ok(data) => {
                state.serialize_field("data", data)?;
                state.serialize_field("err", &None::<Error>)?;
            }
            Err(error) => {
                state.serialize_field("data", &None::<T>)?;
                state.serialize_field("err", error)?;
            }
        }
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireEnvelope<T> {
    data: Option<T>,
    err: Option<Error>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireEnvelope::<T>::deserialize(deserializer)?;
        match (wire.data, wire.err) {
            (Some(data), None) => Ok(Self::ok(data)),
            (None, Some(error)) => Ok(Self::err(error)),
            (Some(_), Some(_)) => Err(de::Error::custom(
                "envelope must not carry both data and err",
            )),
            (None, None) => Err(de::Error::custom(
                "envelope must carry either data or err",
            )),
        }
    }
}

/// Success payload of delete commands: the id that was removed.
///
/// Deletes have no natural return value, but an envelope may never be empty
/// on both sides, so the removed id is echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted<Id> {
    pub id: Id,
}

#[cfg(test)]
mod tests {
    //! Envelope wire-shape coverage.
    use super::*;
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn failure_serializes_with_null_data() {
        let envelope: Envelope<Value> = Envelope::err(Error::not_found("missing"));
        assert_json_snapshot!(envelope, @r#"
        {
          "data": null,
          "err": {
            "kind": "NOT_FOUND",
            "message": "missing"
          }
        }
        "#);
    }

    #[rstest]
    fn success_serializes_with_null_err() {
        let envelope = Envelope::ok(Deleted { id: 4_i64 });
        let value = serde_json::to_value(&envelope).expect("serializes");
        assert_eq!(value, json!({ "data": { "id": 4 }, "err": null }));
    }

    #[rstest]
    #[case(json!({ "data": null, "err": null }))]
    #[case(json!({ "data": 1, "err": { "kind": "UNKNOWN", "message": "x" } }))]
    #[case(json!({}))]
    fn malformed_envelopes_are_rejected(#[case] wire: Value) {
        let result: Result<Envelope<Value>, _> = serde_json::from_value(wire);
        assert!(result.is_err());
    }

    #[rstest]
    fn decodes_failures() {
        let wire = json!({ "data": null, "err": { "kind": "UNAUTHORIZED", "message": "denied" } });
        let envelope: Envelope<Value> = serde_json::from_value(wire).expect("decodes");
        let error = envelope.into_result().expect_err("failure side");
        assert_eq!(error.kind(), crate::domain::ErrorKind::Unauthorized);
    }

    #[rstest]
    fn decodes_success() {
        let wire = json!({ "data": { "items": [], "total": 0 }, "err": null });
        let envelope: Envelope<Value> = serde_json::from_value(wire).expect("decodes");
        assert_eq!(envelope.data(), Some(&json!({ "items": [], "total": 0 })));
    }
}
