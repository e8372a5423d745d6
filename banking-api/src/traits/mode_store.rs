use crate::error::BankingError;
use crate::model::session::SessionMode;

/// Durable storage for the session mode flag.
pub trait ModeStore {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<SessionMode>, BankingError>;

    fn save(&self, mode: SessionMode) -> Result<(), BankingError>;
}
