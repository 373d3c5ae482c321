pub mod shift_cache;
pub mod time_window;
