pub mod error;
pub mod notify;
pub mod shelf;
pub mod storage;
