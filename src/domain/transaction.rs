use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Real-world item: released a hold period after delivery is confirmed.
    Rwi,
    /// Digital goods: released a hold period after creation.
    Digital,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TransactionStatus {
    Ordered,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Refunded,
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    /// Statuses whose escrow may still be released by the job.
    pub const RELEASABLE: [TransactionStatus; 3] = [
        TransactionStatus::Ordered,
        TransactionStatus::Shipped,
        TransactionStatus::Delivered,
    ];
}

/// A timestamp as it arrives from the document store.
///
/// Records written by the platform SDK carry a native `{seconds, nanoseconds}`
/// object, while records written through JSON APIs carry a serialized date.
/// Both are accepted and resolved with [`normalize_timestamp`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum Timestamp {
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    Millis(#[serde(deserialize_with = "millis_from_number")] i64),
    Serialized(String),
}

/// Epoch millis sometimes arrive as JSON floats (`1717000000000.0`). Fractions
/// are truncated; values out of range saturate and fail to normalize later.
fn millis_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Integer(i64),
        Float(f64),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Integer(millis) => millis,
        Number::Float(millis) => millis.trunc() as i64,
    })
}

impl Timestamp {
    /// Converts a native timestamp object into an instant.
    ///
    /// Returns `None` for the other shapes; use [`normalize_timestamp`] to
    /// resolve any of them.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Native {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Native {
            seconds: value.timestamp(),
            nanoseconds: value.timestamp_subsec_nanos(),
        }
    }
}

/// Resolves any accepted timestamp shape to an absolute UTC instant.
///
/// Serialized values may be RFC 3339 or a bare `YYYY-MM-DD` date (midnight UTC).
/// Values that cannot be interpreted yield `None`.
pub fn normalize_timestamp(value: &Timestamp) -> Option<DateTime<Utc>> {
    match value {
        Timestamp::Native { .. } => value.to_date(),
        Timestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
        Timestamp::Serialized(text) => {
            let text = text.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                return Some(parsed.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
    }
}

/// An escrowed marketplace order, as stored by the wider platform.
///
/// Read-only from the point of view of the release job.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub order_id: String,
    pub r#type: TransactionType,
    pub status: TransactionStatus,
    pub buyer_confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_confirmed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub buyer_id: String,
    pub seller_id: String,
}
