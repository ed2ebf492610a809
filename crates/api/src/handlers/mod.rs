pub mod assets;
pub mod monitors;
pub mod organizations;
