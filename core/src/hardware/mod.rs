pub mod dirty;
pub mod execute;
pub mod pack;
pub mod palette;
pub mod renderer;
pub mod scroll;
pub mod vram;
