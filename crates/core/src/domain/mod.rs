pub mod offer;
pub mod profile;
pub mod request;
pub mod requirement;
