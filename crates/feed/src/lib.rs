pub mod http;
pub mod wikipedia;
pub mod yahoo;
