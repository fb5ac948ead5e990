//! Search engine adapters

mod searxng;

pub use searxng::SearxngSearchGateway;
