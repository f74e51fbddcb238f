pub mod environment;
pub mod feed;
pub mod logging;
pub mod reading;
pub mod web;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_FEED: &str = "feed";
