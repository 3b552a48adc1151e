pub mod dashboard;
pub mod jamo_strip;
pub mod menu;
pub mod progress_bar;
pub mod settings;
pub mod stats_page;
pub mod stats_sidebar;
pub mod typing_area;
