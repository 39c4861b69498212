pub mod geometry;
pub mod headless;
pub mod monitor;
pub mod window;
