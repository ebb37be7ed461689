mod http;
mod memory;

pub use http::HttpImageFetcher;
pub use memory::InMemoryImageFetcher;
