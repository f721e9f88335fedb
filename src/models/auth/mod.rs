pub mod requests;
pub mod responses;

pub use requests::{ChangePasswordRequest, LoginRequest, RegisterRequest, SwitchRoleRequest};
pub use responses::{LoginResponse, RefreshTokenResponse};
