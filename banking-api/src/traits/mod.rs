pub mod chain;
pub mod confirm;
pub mod mode_store;
pub mod wallet;
