pub mod state_mock;
