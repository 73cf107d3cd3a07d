pub mod book;
pub mod record_list;
pub mod search;
