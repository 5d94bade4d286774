#![no_std]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

mod combo;
pub mod config;
pub mod error;
pub mod gesture;
pub mod gpio;
pub mod machine;
pub mod registry;
pub mod runner;
pub mod state;

pub use config::*;
pub use error::Error;
pub use gesture::{ButtonId, Gesture, GestureKind};
pub use machine::{ClickMachine, PressSource};
pub use registry::{ChannelDispatcher, Dispatcher, GestureChannel, Handler, HandlerRegistry};
pub use runner::ClickRunner;
pub use state::{ButtonState, ButtonStateTable};

/// 一个trait，抽象了所有可以提供异步“按下”和“释放”事件的硬件源。
pub trait AsyncButtonDriver {
    /// 等待按钮处于按下状态；若已按下则立即返回。
    async fn wait_for_press(&mut self);
    /// 等待按钮处于释放状态；若已释放则立即返回。
    async fn wait_for_release(&mut self);
    /// 当前的按下状态。
    fn is_pressed(&mut self) -> bool;
}
