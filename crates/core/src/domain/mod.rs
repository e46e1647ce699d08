pub mod chat;
pub mod customer;
pub mod knowledge;
pub mod lead;
pub mod store;
