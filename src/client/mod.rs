pub mod room;

pub use room::{RoomClient, RoomConnector, RoomOptions, RoomState, RoomView, Widget};
