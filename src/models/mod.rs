//! Data models for the circulation server

pub mod book;
pub mod copy;
pub mod enums;
pub mod fine;
pub mod request;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use copy::BookCopy;
pub use enums::{CopyStatus, RequestDecision, RequestStatus, Role, TransactionStatus};
pub use fine::{Fine, FineDetails};
pub use request::{BookRequest, BookRequestDetails, CreateBookRequest};
pub use transaction::{CheckoutDetails, Transaction};
pub use user::User;
