pub mod bulletin;
pub mod config;
pub mod entity;
pub mod feed;
pub mod integration;

pub use bulletin::BulletinParser;
pub use bulletin::ConditionCode;
pub use bulletin::ForecastDay;
pub use bulletin::RawBulletinEntry;
pub use bulletin::WeatherObservation;
pub use config::Config;
pub use config::LogLevel;
pub use entity::Entity;
pub use entity::Weather;
pub use feed::parse_feed;
pub use integration::ArsoIntegration;
pub use integration::Integration;
