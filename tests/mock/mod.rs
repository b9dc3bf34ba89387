pub mod store_mock;

pub use store_mock::{MockStore, TestShiftData, TestStateData};
