pub mod grants;
pub mod token;

pub use grants::VideoGrant;
pub use token::{AccessToken, Claims};
