pub mod book;
pub mod coerce;
pub mod id;
