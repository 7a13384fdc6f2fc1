pub mod error;
pub mod event;
pub mod grid;
pub mod storage;
pub mod store;

pub use error::ValidationError;
pub use event::{Event, EventId};
pub use grid::{build_month_grid, CalendarCell, MonthGrid};
pub use storage::FileStorage;
pub use store::EventStore;
