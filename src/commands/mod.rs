pub mod settings;
pub mod window;
