pub mod book_io;
pub mod recovery;
pub mod state;
pub mod store;
