pub mod quantity;
mod reducer;

pub use reducer::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod query;

        pub use query::*;
    }
}
