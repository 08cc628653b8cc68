pub mod history;
pub mod indicator;
pub mod scan;
pub mod signal;
pub mod universe;
