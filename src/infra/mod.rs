pub mod http;
pub mod socket;

pub use http::HttpTransport;
