//! Building blocks for an audit/change-tracking layer over a persisted
//! object graph.
//!
//! This crate provides:
//! - **Loggable propagation**: switch change logging on or off for every
//!   component of an object graph in one call
//! - **JSON snapshots**: an opaque [`Blob`] carrying a serialized object
//!   between the change record, the storage driver and JSON encoders
//! - **Change records**: the record schema a persistence layer stores
//!
//! # Core Types
//!
//! - [`Loggable`]: Capability of a component whose changes may be logged
//! - [`LoggableFlag`]: Default state holder implementing `Loggable`
//! - [`Traverse`]: Static description of a node's children
//! - [`set_loggable_enabled`]: Recursive propagation from a root reference
//! - [`Blob`]: Raw JSON snapshot with storage and JSON pass-through
//! - [`record::ChangeRecord`]: One logged mutation
//!
//! # Examples
//!
//! ```
//! use loggable::{loggable_graph, set_loggable_enabled, Blob, Loggable, LoggableFlag};
//! use loggable::record::{actions, ChangeRecord};
//!
//! #[derive(Default, serde::Serialize)]
//! struct Client {
//!     name: String,
//!     socials: Vec<Social>,
//!     #[serde(skip)]
//!     log: LoggableFlag,
//! }
//!
//! #[derive(Default, serde::Serialize)]
//! struct Social {
//!     handle: String,
//!     #[serde(skip)]
//!     log: LoggableFlag,
//! }
//!
//! loggable_graph!(Client { loggable: log, name, socials });
//! loggable_graph!(Social { loggable: log, handle });
//!
//! let mut client = Client {
//!     name: "Alice".into(),
//!     socials: vec![Social { handle: "@alice".into(), ..Default::default() }],
//!     ..Default::default()
//! };
//!
//! // Silence logging for the whole aggregate during a bulk import.
//! set_loggable_enabled(&mut client, false).unwrap();
//! assert!(!client.socials[0].enabled());
//!
//! // Later, record a change with a snapshot of the object.
//! set_loggable_enabled(&mut client, true).unwrap();
//! if client.enabled() {
//!     let record = ChangeRecord::snapshot(actions::UPDATE, "client-1", "client", &client).unwrap();
//!     assert_eq!(record.object(), &Blob::new(r#"{"name":"Alice","socials":[{"handle":"@alice"}]}"#));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod error;
mod flag;
mod graph;
mod propagate;
pub mod record;
mod storage;

pub use blob::{marshal_json, unmarshal_json, Blob, NULL_LITERAL};
pub use error::Error;
pub use flag::{Loggable, LoggableFlag};
pub use graph::Traverse;
pub use propagate::{set_loggable_enabled, GraphRoot, Propagation, Walker};
pub use storage::StorageValue;
