pub mod book;
pub mod book_request;
pub mod cart;
pub mod category;
pub mod email_log;
pub mod order;
pub mod pricing;
pub mod review;
pub mod settings;
pub mod subscriber;
pub mod types;
pub mod user;
