pub mod notifications;

pub use notifications::{Delivery, NotificationService};
