pub mod base;
pub mod booking;
pub mod flight;
pub mod hotel;
pub mod notification;
pub mod offer;
pub mod supplier;
pub mod transport;
pub mod user;

pub use base::BaseDao;
