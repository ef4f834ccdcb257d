mod bridge;
pub use bridge::*;

mod device;
pub use device::*;

mod entertainment;
pub use entertainment::*;

mod light;
pub use light::*;

mod resource;
pub use resource::*;
