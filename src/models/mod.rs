pub mod location;
pub mod notification;
pub mod playlist;
pub mod prayer;

pub use location::{Location, LocationSource};
pub use notification::{Banner, Notification, NotificationIcon};
pub use playlist::{Playlist, Track};
pub use prayer::{PrayerName, PrayerTimings};
