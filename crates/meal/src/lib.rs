mod catalog;
pub mod rating;

pub use catalog::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod command;
        mod query;

        pub use command::*;
        pub use query::*;
    }
}
