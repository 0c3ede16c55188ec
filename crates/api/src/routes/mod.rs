pub mod auth;
pub mod booking;
pub mod flight;
pub mod hotel;
pub mod notification;
pub mod offer;
pub mod public;
pub mod supplier;
pub mod transport;
pub mod user;
