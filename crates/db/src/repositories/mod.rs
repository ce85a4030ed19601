//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod notification;
pub mod spot_rate;
pub mod transaction;
pub mod wallet;

pub use notification::NotificationRepository;
pub use spot_rate::SpotRateRepository;
pub use transaction::TransactionRepository;
pub use wallet::WalletRepository;
