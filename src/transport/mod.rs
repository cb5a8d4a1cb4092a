pub(crate) mod headers;

pub mod http_client;

pub mod normalizer;

pub mod request;

pub use http_client::{ApiClient, ApiGateway};
pub use request::{ApiRequest, MultipartPart, PartValue, RequestBody};
