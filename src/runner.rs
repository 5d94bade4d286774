use embassy_futures::select::{select3, Either3};
use embassy_time::{Instant, Ticker};

use crate::{gesture::ButtonId, machine::ClickMachine, registry::Dispatcher, AsyncButtonDriver};

/// 把两个物理按钮的边沿和固定周期的扫描接到 [`ClickMachine`] 上。
///
/// 一个任务同时等待 A 的下一个边沿、B 的下一个边沿和下一次扫描，
/// 先到者处理完毕后才开始下一轮等待，因此边沿与扫描永远不会交错修改状态。
pub struct ClickRunner<A: AsyncButtonDriver, B: AsyncButtonDriver> {
    a: A,
    b: B,
}

impl<A: AsyncButtonDriver, B: AsyncButtonDriver> ClickRunner<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// 运行主循环。扫描间隔取自状态机的配置。
    pub async fn run<D: Dispatcher>(&mut self, machine: &mut ClickMachine<D>) -> ! {
        let mut ticker = Ticker::every(machine.config().scan_interval);
        loop {
            let a_pressed = machine.is_pressed(ButtonId::A);
            let b_pressed = machine.is_pressed(ButtonId::B);

            let event = select3(
                next_edge(&mut self.a, a_pressed),
                next_edge(&mut self.b, b_pressed),
                ticker.next(),
            )
            .await;

            let now = Instant::now();
            match event {
                Either3::First(pressed) => machine.apply_edge(ButtonId::A, pressed, now),
                Either3::Second(pressed) => machine.apply_edge(ButtonId::B, pressed, now),
                Either3::Third(()) => {
                    let (a, b) = (&mut self.a, &mut self.b);
                    machine.poll(now, &mut |button: ButtonId| match button {
                        ButtonId::A => a.is_pressed(),
                        ButtonId::B => b.is_pressed(),
                        ButtonId::Combo => a.is_pressed() && b.is_pressed(),
                    });
                }
            }
        }
    }

    /// 获取两个底层驱动的可变引用
    pub fn drivers_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.a, &mut self.b)
    }

    pub fn into_inner(self) -> (A, B) {
        (self.a, self.b)
    }
}

/// 等待与上次观察到的状态相反的电平，返回新的按下状态。
async fn next_edge<T: AsyncButtonDriver>(driver: &mut T, pressed: bool) -> bool {
    if pressed {
        driver.wait_for_release().await;
        false
    } else {
        driver.wait_for_press().await;
        true
    }
}
