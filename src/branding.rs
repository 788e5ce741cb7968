pub const APP_DISPLAY_NAME: &str = "Desktop Widget Manager";
pub const APP_ID: &str = "desk_widgets";
