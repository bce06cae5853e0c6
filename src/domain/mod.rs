pub mod payload;
pub mod receipt;
pub mod schema;
pub mod ticket;
pub mod workspace;
