//! Change notification for the inventory collection.
//!
//! A notification carries no payload: it only means "re-read the collection".

pub mod bus;
pub mod notifier;

pub use bus::{Listener, Subscription};
pub use notifier::ChangeNotifier;
