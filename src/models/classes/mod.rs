pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::*;
pub use requests::*;
pub use responses::*;
