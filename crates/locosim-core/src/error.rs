use thiserror::Error;

/// Errors raised by structural world operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocoError {
    #[error("Tile ({x}, {y}) is outside the map")]
    TileOutOfBounds { x: i32, y: i32 },

    #[error("Tile ({x}, {y}) has no element at stack index {index}")]
    ElementNotFound { x: i32, y: i32, index: u8 },

    #[error("Tile element storage exhausted: {capacity} slots in use after reorganisation")]
    ElementStorageExhausted { capacity: usize },

    #[error("Tile ({x}, {y}) stack is full")]
    StackFull { x: i32, y: i32 },

    #[error("Yaw accuracy {0} is not in 0..=4")]
    InvalidYawAccuracy(u8),
}
