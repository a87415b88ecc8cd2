// Module messaging - Worker to observer notification plumbing

pub mod notification;

pub use notification::{
    create_notification_channel, drain, Notification, NotificationCategory, NotificationConsumer,
    NotificationLevel, NotificationProducer,
};
