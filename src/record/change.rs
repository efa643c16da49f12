//! The change record written once per logged mutation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChangeSchema, RecordField};
use crate::{Blob, Error, StorageValue};

/// One logged mutation of a persisted object.
///
/// A record is built once, when the change is logged, and is not modified
/// afterwards. The changed object travels as an opaque JSON [`Blob`].
///
/// # Example
///
/// ```
/// use loggable::record::{actions, ChangeRecord};
/// use loggable::Blob;
///
/// let record = ChangeRecord::new(
///     actions::UPDATE,
///     "client-42",
///     "client",
///     Blob::new(r#"{"name":"Alice"}"#),
/// )
/// .with_changed_by("user-7")
/// .with_changed_where("backoffice");
///
/// assert_eq!(record.action(), "update");
/// assert_eq!(record.changed_by(), "user-7");
/// assert!(!record.object().is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    changed_by: String,
    changed_where: String,
    action: String,
    object_id: String,
    object_type: String,
    object: Blob,
}

impl ChangeRecord {
    /// Creates a record with a fresh identifier and the current time.
    ///
    /// Actor and origin start empty; set them with
    /// [`with_changed_by`](Self::with_changed_by) and
    /// [`with_changed_where`](Self::with_changed_where).
    pub fn new(
        action: impl Into<String>,
        object_id: impl Into<String>,
        object_type: impl Into<String>,
        object: Blob,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            changed_by: String::new(),
            changed_where: String::new(),
            action: action.into(),
            object_id: object_id.into(),
            object_type: object_type.into(),
            object,
        }
    }

    /// Creates a record whose object is the JSON serialization of `object`.
    pub fn snapshot<T: Serialize + ?Sized>(
        action: impl Into<String>,
        object_id: impl Into<String>,
        object_type: impl Into<String>,
        object: &T,
    ) -> Result<Self, Error> {
        let record = Self::new(action, object_id, object_type, Blob::snapshot(object)?);

        tracing::debug!(
            record_id = %record.id,
            action = %record.action,
            object_id = %record.object_id,
            object_type = %record.object_type,
            snapshot_len = record.object.len(),
            "change record built"
        );

        Ok(record)
    }

    /// Sets the actor that made the change.
    pub fn with_changed_by(mut self, changed_by: impl Into<String>) -> Self {
        self.changed_by = changed_by.into();
        self
    }

    /// Sets where the change originated.
    pub fn with_changed_where(mut self, changed_where: impl Into<String>) -> Self {
        self.changed_where = changed_where.into();
        self
    }

    /// Replaces the generated identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Replaces the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns the record identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns when the record was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the actor identifier.
    pub fn changed_by(&self) -> &str {
        &self.changed_by
    }

    /// Returns the origin identifier.
    pub fn changed_where(&self) -> &str {
        &self.changed_where
    }

    /// Returns the action label.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the changed object's identifier.
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Returns the changed object's type label.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Returns the snapshot of the changed object.
    pub fn object(&self) -> &Blob {
        &self.object
    }

    /// Returns the storage value of a single field.
    pub fn value_of(&self, field: RecordField) -> Result<StorageValue, Error> {
        Ok(match field {
            RecordField::Id => StorageValue::Text(self.id.to_string()),
            RecordField::CreatedAt => StorageValue::Timestamp(self.created_at),
            RecordField::ChangedBy => StorageValue::from(self.changed_by.as_str()),
            RecordField::ChangedWhere => StorageValue::from(self.changed_where.as_str()),
            RecordField::Action => StorageValue::from(self.action.as_str()),
            RecordField::ObjectId => StorageValue::from(self.object_id.as_str()),
            RecordField::ObjectType => StorageValue::from(self.object_type.as_str()),
            RecordField::Object => self.object.to_storage_value()?,
        })
    }

    /// Returns `(column, value)` pairs for every column of `schema`, in
    /// column order.
    pub fn to_row<'s>(
        &self,
        schema: &'s ChangeSchema,
    ) -> Result<Vec<(&'s str, StorageValue)>, Error> {
        schema
            .columns()
            .iter()
            .map(|column| {
                self.value_of(column.field())
                    .map(|value| (column.name(), value))
            })
            .collect()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChangeRecord[id={}, action={}, object_type={}, object_id={}",
            self.id, self.action, self.object_type, self.object_id
        )?;

        if !self.changed_by.is_empty() {
            write!(f, ", changed_by={}", self.changed_by)?;
        }
        if !self.changed_where.is_empty() {
            write!(f, ", changed_where={}", self.changed_where)?;
        }

        write!(f, ", object_len={}]", self.object.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::actions;
    use chrono::TimeZone;

    #[derive(Serialize)]
    struct Social {
        network: &'static str,
        handle: &'static str,
    }

    fn sample() -> ChangeRecord {
        ChangeRecord::new(
            actions::CREATE,
            "social-1",
            "social",
            Blob::new(r#"{"network":"x"}"#),
        )
    }

    #[test]
    fn new_record_has_identity_and_time() {
        let before = Utc::now();
        let record = sample();

        assert!(!record.id().is_nil());
        assert!(record.created_at() >= before);
        assert_eq!(record.changed_by(), "");
        assert_eq!(record.changed_where(), "");
        assert_eq!(record.object_id(), "social-1");
        assert_eq!(record.object_type(), "social");
    }

    #[test]
    fn records_get_distinct_ids() {
        assert_ne!(sample().id(), sample().id());
    }

    #[test]
    fn snapshot_serializes_object() {
        let record = ChangeRecord::snapshot(
            actions::DELETE,
            "social-2",
            "social",
            &Social {
                network: "mastodon",
                handle: "@alice",
            },
        )
        .unwrap();

        assert_eq!(
            record.object().as_bytes(),
            br#"{"network":"mastodon","handle":"@alice"}"#
        );
        assert_eq!(record.action(), "delete");
    }

    #[test]
    fn row_follows_schema_order() {
        let id = Uuid::nil();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let record = sample()
            .with_id(id)
            .with_created_at(at)
            .with_changed_by("user-1");

        let schema = ChangeSchema::default();
        let row = record.to_row(&schema).unwrap();

        assert_eq!(row.len(), 8);
        assert_eq!(row[0], ("id", StorageValue::Text(id.to_string())));
        assert_eq!(row[1], ("created_at", StorageValue::Timestamp(at)));
        assert_eq!(row[2], ("changed_by", StorageValue::Text("user-1".into())));
        assert_eq!(row[4], ("action", StorageValue::Text("create".into())));
        assert_eq!(
            row[7],
            ("object", StorageValue::Text(r#"{"network":"x"}"#.into()))
        );
    }

    #[test]
    fn null_snapshot_is_stored_as_null() {
        let record = ChangeRecord::new(actions::DELETE, "1", "thing", Blob::default());
        let value = record.value_of(RecordField::Object).unwrap();
        assert_eq!(value, StorageValue::Null);
    }

    #[test]
    fn row_uses_renamed_columns() {
        let schema = ChangeSchema::default().with_column_name(RecordField::Object, "payload");
        let row = sample().to_row(&schema).unwrap();
        assert_eq!(row[7].0, "payload");
    }

    #[test]
    fn json_round_trip_keeps_snapshot_verbatim() {
        let record = sample().with_changed_where("api");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""object":{"network":"x"}"#));

        let back: ChangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn display_summarises_without_payload() {
        let record = sample().with_changed_by("user-9");
        let display = record.to_string();

        assert!(display.contains("action=create"));
        assert!(display.contains("changed_by=user-9"));
        assert!(!display.contains("changed_where"));
        assert!(!display.contains("network"));
    }
}
