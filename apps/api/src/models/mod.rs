pub mod chat;
pub mod wanted_person;
