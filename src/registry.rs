use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Receiver, Sender},
};

use crate::gesture::{ButtonId, Gesture, GestureKind};

/// 手势回调。回调在边沿或扫描的上下文中同步执行，应尽快返回。
pub type Handler<'a> = &'a dyn Fn();

/// 手势的去向。
///
/// [`ClickMachine`](crate::ClickMachine) 在更新完按钮状态之后才调用 `dispatch`，
/// 因此回调中的失败不会破坏状态机自身的不变量。
pub trait Dispatcher {
    fn dispatch(&mut self, gesture: Gesture);
}

#[derive(Clone, Copy, Default)]
struct Handlers<'a> {
    down: Option<Handler<'a>>,
    up: Option<Handler<'a>>,
    single: Option<Handler<'a>>,
    double: Option<Handler<'a>>,
    long: Option<Handler<'a>>,
}

impl<'a> Handlers<'a> {
    const fn new() -> Self {
        Self {
            down: None,
            up: None,
            single: None,
            double: None,
            long: None,
        }
    }

    fn slot(&self, kind: GestureKind) -> &Option<Handler<'a>> {
        match kind {
            GestureKind::Down => &self.down,
            GestureKind::Up => &self.up,
            GestureKind::Single => &self.single,
            GestureKind::Double => &self.double,
            GestureKind::Long => &self.long,
        }
    }

    fn slot_mut(&mut self, kind: GestureKind) -> &mut Option<Handler<'a>> {
        match kind {
            GestureKind::Down => &mut self.down,
            GestureKind::Up => &mut self.up,
            GestureKind::Single => &mut self.single,
            GestureKind::Double => &mut self.double,
            GestureKind::Long => &mut self.long,
        }
    }
}

/// 以 (按钮, 手势) 为键的回调表，每个键只有一个回调槽。
///
/// 同一个键重复注册时后者覆盖前者；没有注册回调的手势被静默忽略。
#[derive(Clone, Copy, Default)]
pub struct HandlerRegistry<'a> {
    a: Handlers<'a>,
    b: Handlers<'a>,
    combo: Handlers<'a>,
}

impl<'a> HandlerRegistry<'a> {
    pub const fn new() -> Self {
        Self {
            a: Handlers::new(),
            b: Handlers::new(),
            combo: Handlers::new(),
        }
    }

    fn handlers(&self, button: ButtonId) -> &Handlers<'a> {
        match button {
            ButtonId::A => &self.a,
            ButtonId::B => &self.b,
            ButtonId::Combo => &self.combo,
        }
    }

    fn handlers_mut(&mut self, button: ButtonId) -> &mut Handlers<'a> {
        match button {
            ButtonId::A => &mut self.a,
            ButtonId::B => &mut self.b,
            ButtonId::Combo => &mut self.combo,
        }
    }

    /// 注册回调，替换该键上已有的回调。
    pub fn register(&mut self, button: ButtonId, kind: GestureKind, handler: Handler<'a>) {
        *self.handlers_mut(button).slot_mut(kind) = Some(handler);
    }

    /// 移除回调。
    pub fn clear(&mut self, button: ButtonId, kind: GestureKind) {
        *self.handlers_mut(button).slot_mut(kind) = None;
    }

    pub fn is_registered(&self, button: ButtonId, kind: GestureKind) -> bool {
        self.handlers(button).slot(kind).is_some()
    }

    pub fn on_single_click(&mut self, button: ButtonId, handler: Handler<'a>) {
        self.register(button, GestureKind::Single, handler);
    }

    pub fn on_double_click(&mut self, button: ButtonId, handler: Handler<'a>) {
        self.register(button, GestureKind::Double, handler);
    }

    pub fn on_long_click(&mut self, button: ButtonId, handler: Handler<'a>) {
        self.register(button, GestureKind::Long, handler);
    }

    pub fn on_down(&mut self, button: ButtonId, handler: Handler<'a>) {
        self.register(button, GestureKind::Down, handler);
    }

    pub fn on_up(&mut self, button: ButtonId, handler: Handler<'a>) {
        self.register(button, GestureKind::Up, handler);
    }

    /// 查找并同步调用回调；未注册则什么也不做。
    pub fn invoke(&self, gesture: Gesture) {
        if let Some(handler) = self.handlers(gesture.button).slot(gesture.kind) {
            handler();
        }
    }

    /// 从通道中取出手势并调用回调。
    ///
    /// 与 [`ChannelDispatcher`] 配合使用，让回调在独立的任务中执行，
    /// 不占用边沿与扫描的时间。
    pub async fn run_deferred<M: RawMutex, const N: usize>(
        &self,
        receiver: Receiver<'_, M, Gesture, N>,
    ) -> ! {
        loop {
            let gesture = receiver.receive().await;
            self.invoke(gesture);
        }
    }
}

impl Dispatcher for HandlerRegistry<'_> {
    fn dispatch(&mut self, gesture: Gesture) {
        self.invoke(gesture);
    }
}

impl core::fmt::Debug for HandlerRegistry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut registered = 0;
        for button in ButtonId::ALL {
            for kind in GestureKind::ALL {
                if self.is_registered(button, kind) {
                    registered += 1;
                }
            }
        }
        f.debug_struct("HandlerRegistry")
            .field("registered", &registered)
            .finish()
    }
}

pub type GestureChannel<M, const N: usize> = Channel<M, Gesture, N>;

/// 把手势放入通道，由 [`HandlerRegistry::run_deferred`] 在别处执行回调。
///
/// 通道已满时丢弃该手势并打印警告，不会阻塞调用方。
pub struct ChannelDispatcher<'a, M: RawMutex, const N: usize> {
    sender: Sender<'a, M, Gesture, N>,
    dropped: u32,
}

impl<'a, M: RawMutex, const N: usize> ChannelDispatcher<'a, M, N> {
    pub fn new(channel: &'a GestureChannel<M, N>) -> Self {
        Self {
            sender: channel.sender(),
            dropped: 0,
        }
    }

    /// 因通道已满而丢弃的手势数量。
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<M: RawMutex, const N: usize> Dispatcher for ChannelDispatcher<'_, M, N> {
    fn dispatch(&mut self, gesture: Gesture) {
        if self.sender.try_send(gesture).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("gesture queue full, dropping {:?}", gesture);
        }
    }
}
