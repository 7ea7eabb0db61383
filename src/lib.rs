pub mod api;
pub mod config;
pub mod image;
pub mod loader;
pub mod models;
pub mod request;
pub mod server;

pub use loader::{load_card, load_showcase, CardLoader, CardSource};
pub use models::{Card, CardImage, CoffeeRecord};
pub use request::HttpError;
