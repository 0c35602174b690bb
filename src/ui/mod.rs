pub mod detail;
pub mod events_table;
pub mod theme;
pub mod topics;

pub use events_table::EventsTableView;
pub use theme::Palette;
pub use topics::TopicsView;
