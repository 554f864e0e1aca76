//! Request types: the caller's logical request and the resolved wire request.

mod method;
mod spec;
mod transport;

pub use method::HttpMethod;
pub use spec::ApiRequest;
pub use transport::TransportRequest;
