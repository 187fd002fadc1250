pub mod client {
    pub mod client;
    pub mod error;
}

pub mod chooser;
pub mod logger;
pub mod models;
pub mod utils;
