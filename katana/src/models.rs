pub mod args;
pub mod frame_range;
pub mod outputs;
pub mod render_target;
pub mod scene;
pub mod toolchain;
pub mod version;
