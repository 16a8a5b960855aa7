pub mod app;
pub mod camera_controls;
pub mod controls_panel;
pub mod game_view;
pub mod help_overlay;
pub mod inventory_panel;
pub mod loading_overlay;
pub mod map_view;
pub mod mission_report;
pub mod settings_modal;
pub mod shop_panel;
pub mod stats_panel;
pub mod time_display;
pub mod title_screen;

pub use app::App;
