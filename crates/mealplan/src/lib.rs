mod aggregator;
pub mod calendar;
pub mod placement;

pub use aggregator::*;
pub use calendar::{CalendarError, DateRange};

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod command;
        mod query;

        pub use command::*;
        pub use query::*;
    }
}
