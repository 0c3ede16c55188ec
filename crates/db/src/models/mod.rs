mod booking;
mod flight;
mod hotel;
mod notification;
mod offer;
mod supplier;
mod transport;
mod user;

pub use booking::*;
pub use flight::*;
pub use hotel::*;
pub use notification::*;
pub use offer::*;
pub use supplier::*;
pub use transport::*;
pub use user::*;
