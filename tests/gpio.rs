use core::convert::Infallible;
use embassy_button_clicks::{
    gpio::{ActiveLevel, GpioButton},
    ButtonId, ClickConfig, ClickMachine, ClickRunner, Dispatcher, Gesture, GestureKind,
};
use embassy_time::{Duration, Timer};
use tokio::sync::watch;

struct MockPin {
    rx: watch::Receiver<bool>,
}
struct MockPinController {
    tx: watch::Sender<bool>,
}
impl MockPin {
    fn split() -> (MockPinController, Self) {
        let (tx, rx) = watch::channel(true);
        (MockPinController { tx }, Self { rx })
    }
}
impl MockPinController {
    fn press(&self) {
        self.tx.send(false).unwrap();
    }
    fn release(&self) {
        self.tx.send(true).unwrap();
    }
}
impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}
impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(*self.rx.borrow())
    }
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!*self.rx.borrow())
    }
}
impl embedded_hal_async::digital::Wait for MockPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.rx.wait_for(|state| *state).await.unwrap();
        Ok(())
    }
    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.rx.wait_for(|state| !*state).await.unwrap();
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_low().await?;
        self.wait_for_high().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await?;
        self.wait_for_low().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.rx.wait_for(|_| true).await.unwrap();
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<Gesture>,
}

impl Dispatcher for Recorder {
    fn dispatch(&mut self, gesture: Gesture) {
        self.events.push(gesture);
    }
}

fn g(button: ButtonId, kind: GestureKind) -> Gesture {
    Gesture::new(button, kind)
}

type Runner = ClickRunner<GpioButton<MockPin>, GpioButton<MockPin>>;

fn setup() -> (MockPinController, MockPinController, Runner, ClickMachine<Recorder>) {
    let (ctrl_a, pin_a) = MockPin::split();
    let (ctrl_b, pin_b) = MockPin::split();
    let runner = ClickRunner::new(
        GpioButton::new(pin_a, ActiveLevel::Low),
        GpioButton::new(pin_b, ActiveLevel::Low),
    );
    let machine = ClickMachine::new(ClickConfig::default(), Recorder::default());
    (ctrl_a, ctrl_b, runner, machine)
}

/// 运行主循环直到超时。控制端必须活得比主循环久，否则模拟引脚的等待会出错。
async fn drive(runner: &mut Runner, machine: &mut ClickMachine<Recorder>, total: Duration) {
    let _ = embassy_time::with_timeout(total, runner.run(machine)).await;
}

// --- 单击与双击 ---

async fn click_generator(a: &MockPinController) {
    Timer::after(Duration::from_millis(50)).await;

    // 单击
    a.press();
    Timer::after(Duration::from_millis(50)).await;
    a.release();
    Timer::after(Duration::from_millis(700)).await;

    // 双击
    a.press();
    Timer::after(Duration::from_millis(50)).await;
    a.release();
    Timer::after(Duration::from_millis(80)).await;
    a.press();
    Timer::after(Duration::from_millis(50)).await;
    a.release();
}

#[tokio::test]
async fn test_gpio_single_then_double_click() {
    let (ctrl_a, _ctrl_b, mut runner, mut machine) = setup();

    tokio::join!(
        click_generator(&ctrl_a),
        drive(&mut runner, &mut machine, Duration::from_millis(1700)),
    );

    let classified: Vec<_> = machine
        .dispatcher()
        .events
        .iter()
        .copied()
        .filter(|e| !matches!(e.kind, GestureKind::Down | GestureKind::Up))
        .collect();
    assert_eq!(
        classified,
        vec![g(ButtonId::A, GestureKind::Single), g(ButtonId::A, GestureKind::Double)]
    );
}

// --- 长按 ---

async fn hold_generator(a: &MockPinController) {
    Timer::after(Duration::from_millis(50)).await;
    a.press();
    Timer::after(Duration::from_millis(1100)).await;
    a.release();
}

#[tokio::test]
async fn test_gpio_long_press() {
    let (ctrl_a, _ctrl_b, mut runner, mut machine) = setup();

    tokio::join!(
        hold_generator(&ctrl_a),
        drive(&mut runner, &mut machine, Duration::from_millis(1800)),
    );

    assert_eq!(
        machine.dispatcher().events,
        vec![
            g(ButtonId::A, GestureKind::Down),
            g(ButtonId::A, GestureKind::Long),
            g(ButtonId::A, GestureKind::Up),
        ]
    );
}

// --- 组合键 ---

async fn combo_generator(a: &MockPinController, b: &MockPinController) {
    Timer::after(Duration::from_millis(50)).await;
    a.press();
    Timer::after(Duration::from_millis(40)).await;
    b.press();
    Timer::after(Duration::from_millis(100)).await;
    a.release();
    Timer::after(Duration::from_millis(20)).await;
    b.release();
}

#[tokio::test]
async fn test_gpio_combo_click() {
    let (ctrl_a, ctrl_b, mut runner, mut machine) = setup();

    tokio::join!(
        combo_generator(&ctrl_a, &ctrl_b),
        drive(&mut runner, &mut machine, Duration::from_millis(1000)),
    );

    assert_eq!(
        machine.dispatcher().events,
        vec![
            g(ButtonId::A, GestureKind::Down),
            g(ButtonId::Combo, GestureKind::Down),
            g(ButtonId::Combo, GestureKind::Up),
            g(ButtonId::B, GestureKind::Down),
            g(ButtonId::B, GestureKind::Up),
            g(ButtonId::Combo, GestureKind::Single),
        ]
    );
}
