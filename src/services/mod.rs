pub mod completion;
pub mod storage;
pub mod whatsapp;
