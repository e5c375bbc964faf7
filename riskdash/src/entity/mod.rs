pub mod incident;
pub mod upload;
