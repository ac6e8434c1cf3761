//! SQLite connection implementation for Quill

mod connection;

pub use connection::SqliteConnection;
