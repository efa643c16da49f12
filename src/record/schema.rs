//! Table and column naming for change records.

use std::fmt;

/// A field of [`ChangeRecord`](crate::record::ChangeRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Unique record identifier
    Id,
    /// Insertion timestamp
    CreatedAt,
    /// Actor that made the change
    ChangedBy,
    /// Origin or location of the change
    ChangedWhere,
    /// Action label
    Action,
    /// Identifier of the changed object
    ObjectId,
    /// Type label of the changed object
    ObjectType,
    /// Snapshot of the changed object
    Object,
}

impl RecordField {
    /// All fields, in column order.
    pub const ALL: [RecordField; 8] = [
        RecordField::Id,
        RecordField::CreatedAt,
        RecordField::ChangedBy,
        RecordField::ChangedWhere,
        RecordField::Action,
        RecordField::ObjectId,
        RecordField::ObjectType,
        RecordField::Object,
    ];

    /// Returns the column name used when none is configured.
    pub fn default_column(self) -> &'static str {
        match self {
            RecordField::Id => "id",
            RecordField::CreatedAt => "created_at",
            RecordField::ChangedBy => "changed_by",
            RecordField::ChangedWhere => "changed_where",
            RecordField::Action => "action",
            RecordField::ObjectId => "object_id",
            RecordField::ObjectType => "object_type",
            RecordField::Object => "object",
        }
    }

    /// Returns the storage type of the column.
    pub fn kind(self) -> ColumnKind {
        match self {
            RecordField::Id => ColumnKind::Uuid,
            RecordField::CreatedAt => ColumnKind::Timestamp,
            RecordField::Object => ColumnKind::Json,
            _ => ColumnKind::Text,
        }
    }

    /// Returns true for the primary key column.
    pub fn is_primary_key(self) -> bool {
        self == RecordField::Id
    }

    /// Returns true for columns that carry a secondary index.
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            RecordField::ChangedBy
                | RecordField::ChangedWhere
                | RecordField::ObjectId
                | RecordField::ObjectType
        )
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_column())
    }
}

/// Storage type of a change-record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// UUID
    Uuid,
    /// Timestamp, defaulted at insert time
    Timestamp,
    /// Free text
    Text,
    /// JSON document
    Json,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Uuid => write!(f, "uuid"),
            ColumnKind::Timestamp => write!(f, "timestamp"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Json => write!(f, "jsonb"),
        }
    }
}

/// A named column bound to a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    field: RecordField,
    name: String,
}

impl Column {
    /// Returns the record field stored in this column.
    pub fn field(&self) -> RecordField {
        self.field
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the storage type.
    pub fn kind(&self) -> ColumnKind {
        self.field.kind()
    }

    /// Returns true for the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.field.is_primary_key()
    }

    /// Returns true if the column is indexed.
    pub fn is_indexed(&self) -> bool {
        self.field.is_indexed()
    }
}

/// Naming of the change-record table and its columns.
///
/// The default schema uses the `change_logs` table and the snake_case
/// field names as columns. Hosts with an existing table rename pieces
/// with the builder methods.
///
/// # Example
///
/// ```
/// use loggable::record::{ChangeSchema, RecordField};
///
/// let schema = ChangeSchema::new("audit_changes")
///     .with_column_name(RecordField::ChangedBy, "actor_id");
///
/// assert_eq!(schema.table(), "audit_changes");
/// assert_eq!(schema.column_name(RecordField::ChangedBy), "actor_id");
/// assert_eq!(schema.primary_key(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSchema {
    table: String,
    columns: Vec<Column>,
}

impl ChangeSchema {
    /// Table name used by [`ChangeSchema::default`].
    pub const DEFAULT_TABLE: &'static str = "change_logs";

    /// Creates a schema for `table` with default column names.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: RecordField::ALL
                .iter()
                .map(|&field| Column {
                    field,
                    name: field.default_column().to_string(),
                })
                .collect(),
        }
    }

    /// Renames the column that stores `field`.
    pub fn with_column_name(mut self, field: RecordField, name: impl Into<String>) -> Self {
        if let Some(column) = self.columns.iter_mut().find(|c| c.field == field) {
            column.name = name.into();
        }
        self
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns all columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column name for `field`.
    pub fn column_name(&self, field: RecordField) -> &str {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map_or(field.default_column(), Column::name)
    }

    /// Returns the primary key column name.
    pub fn primary_key(&self) -> &str {
        self.column_name(RecordField::Id)
    }

    /// Returns the names of indexed columns, in column order.
    pub fn indexed_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_indexed())
            .map(Column::name)
            .collect()
    }
}

impl Default for ChangeSchema {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TABLE)
    }
}
