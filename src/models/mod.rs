mod notification;

pub use notification::{
    Address, Contact, Event, EventType, Incident, NotificationRequest, Object, Priority, Severity,
};
