pub mod banner;
pub mod header;
pub mod next_prayer;
pub mod player;
pub mod prayers;
pub mod statusbar;
