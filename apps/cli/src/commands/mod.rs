pub mod plugin;
pub mod scripts;
