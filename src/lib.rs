pub mod clients;
pub mod config;
pub mod criteria;
pub mod http;
pub mod logging;
pub mod post_url;

pub use clients::facebook::{FacebookClient, FacebookCredentials};
pub use clients::{GraphError, PostClient, PostRecord};
pub use criteria::{Criteria, Request};
