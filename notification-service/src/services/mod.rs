pub mod repository;

pub use repository::{InMemoryNotificationRepository, NotificationRepository};
