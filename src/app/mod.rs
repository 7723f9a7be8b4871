pub mod batch;
pub mod response;
