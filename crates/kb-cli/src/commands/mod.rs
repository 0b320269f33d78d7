pub mod board;
pub mod build;
pub mod class;
pub mod dispatch;
pub mod ids;
pub mod migrate;
pub mod subject;
pub mod sync;
pub mod verify;
