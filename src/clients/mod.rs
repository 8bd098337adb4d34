pub mod upstash;
pub use upstash::UpstashClient;

pub mod x_api;
pub use x_api::XSearchClient;
