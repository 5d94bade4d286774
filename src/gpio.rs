use crate::AsyncButtonDriver;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 一个直接由GPIO输入引脚驱动的按钮。
///
/// 电气层面的消抖由硬件或 HAL 负责，这里只读取电平。
pub struct GpioButton<P: InputPin> {
    pin: P,
    active_level: ActiveLevel,
}

impl<P: InputPin> GpioButton<P> {
    /// 创建一个新的GPIO按钮。
    ///
    /// # 参数
    /// * `pin`: 一个同时实现了 `InputPin` 与 `Wait` 的GPIO引脚。
    /// * `active_level`: 按钮按下时的有效电平。
    pub fn new(pin: P, active_level: ActiveLevel) -> Self {
        Self { pin, active_level }
    }
}

impl<P> AsyncButtonDriver for GpioButton<P>
where
    P: InputPin + Wait,
{
    async fn wait_for_press(&mut self) {
        match self.active_level {
            ActiveLevel::Low => self.pin.wait_for_low().await.unwrap_or_default(),
            ActiveLevel::High => self.pin.wait_for_high().await.unwrap_or_default(),
        }
    }

    async fn wait_for_release(&mut self) {
        match self.active_level {
            ActiveLevel::Low => self.pin.wait_for_high().await.unwrap_or_default(),
            ActiveLevel::High => self.pin.wait_for_low().await.unwrap_or_default(),
        }
    }

    fn is_pressed(&mut self) -> bool {
        // 读取失败视为未按下
        match self.active_level {
            ActiveLevel::Low => self.pin.is_low().unwrap_or(false),
            ActiveLevel::High => self.pin.is_high().unwrap_or(false),
        }
    }
}
