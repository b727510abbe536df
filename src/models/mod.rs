pub mod climate;
pub mod daily;
pub mod forecast;
pub mod garden;
pub mod health;
pub mod notification;
pub mod travel;

pub use climate::*;
pub use daily::*;
pub use forecast::*;
pub use garden::*;
pub use health::*;
pub use notification::*;
pub use travel::*;
