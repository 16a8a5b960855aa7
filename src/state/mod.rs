pub mod camera;
pub mod choreographer;
pub mod loader;

pub use camera::Camera;
pub use choreographer::{Choreographer, LoaderSnapshot, Runtime};
pub use loader::Phase;
