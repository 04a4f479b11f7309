pub mod graphql;
pub mod queries;
pub mod rest;
pub mod traits;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use graphql::{GraphQlClient, ANONYMOUS_USER};
pub use rest::RequestClient;
pub use traits::HttpTransport;
pub use transport::ReqwestTransport;
pub use types::{
    ApiError, ChatResponse, DeleteResponse, GraphQlRequestOptions, GraphQlResponse,
    HistoryResponse, HttpRequest, HttpResponse,
};
