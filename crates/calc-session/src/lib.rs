//! Editing sessions that keep previews in sync with calculator documents.
//!
//! A session owns one product document plus the transient preview state
//! derived from it. Editors feed it tagged events; each accepted event
//! mutates the document and recomputes the preview before returning.
//! Requests to the configuration store and the routing service are modelled
//! as ticketed round trips so that late, superseded answers are dropped.

pub mod configurator;
pub mod context;
pub mod dirty;
pub mod distance;
pub mod error;
pub mod event;
pub mod requests;

pub use configurator::{ConfiguratorSession, Preview};
pub use context::SessionContext;
pub use dirty::DirtyTracker;
pub use distance::{DistancePreview, DistanceSession, Measurement};
pub use error::{Result, SessionError};
pub use event::{ConfigEvent, DistanceEvent};
pub use requests::{Completion, RequestKind, RequestTicket, RequestTracker};
