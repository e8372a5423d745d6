pub mod account;
pub mod chain;
pub mod deposit;
pub mod portfolio;
pub mod session;
pub mod strategy;
pub mod trader;
