//! Delivery strategies: how a [`Resolution`](crate::resolve::Resolution)
//! is turned into listener invocations.

pub(crate) mod background;
pub(crate) mod sequential;
pub(crate) mod traits;

pub use background::{Background, BackgroundDelivery, Slot};
pub use sequential::SequentialDelivery;
pub use traits::Delivery;
