// SPDX-License-Identifier: GPL-3.0-only
pub mod dbus;
pub mod dispatcher;
pub mod handle;
pub mod traits;

pub use dbus::{DbusConnector, DbusStore};
pub use dispatcher::dispatch;
pub use handle::ServiceHandle;
pub use traits::{Connector, FieldMap, RepositoryRecord, StoreProxy};
