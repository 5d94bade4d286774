use core::cmp::min;

use embassy_time::Instant;

use crate::{
    combo::{ComboDetector, Route},
    config::ClickConfig,
    error::Error,
    gesture::{ButtonId, Gesture, GestureKind},
    registry::Dispatcher,
    state::{ButtonState, ButtonStateTable},
};

/// 物理按钮按下状态的即时读取，供扫描时核对边沿。
pub trait PressSource {
    fn is_pressed(&mut self, button: ButtonId) -> bool;
}

impl<F> PressSource for F
where
    F: FnMut(ButtonId) -> bool,
{
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        self(button)
    }
}

/// 点击识别状态机。
///
/// 边沿通过 [`on_edge`](Self::on_edge) 送入，周期扫描通过
/// [`on_tick`](Self::on_tick) 或 [`poll`](Self::poll) 驱动。
/// 两条路径都需要 `&mut self`，因此同一时刻只会有一条路径在修改按钮状态；
/// 若边沿与扫描运行在不同的执行上下文中，请用互斥锁包住整个状态机。
///
/// 每次分发之前，相关的按钮状态都已经更新完毕。
/// 组合开始时，先按下的那个按钮已经分发的 `Down` 不会再有对应的 `Up`，
/// 之后的 `Up` 归属 `Combo`。
pub struct ClickMachine<D: Dispatcher> {
    config: ClickConfig,
    table: ButtonStateTable,
    combo: ComboDetector,
    dispatcher: D,
}

impl<D: Dispatcher> ClickMachine<D> {
    pub fn new(config: ClickConfig, dispatcher: D) -> Self {
        Self {
            config,
            table: ButtonStateTable::new(),
            combo: ComboDetector::new(),
            dispatcher,
        }
    }

    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    pub fn state(&self, button: ButtonId) -> &ButtonState {
        self.table.get(button)
    }

    pub fn states(&self) -> &ButtonStateTable {
        &self.table
    }

    /// 最近一次观察到的物理按下状态。`Combo` 为两个按钮都按下。
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.combo.is_pressed(button)
    }

    /// 是否正处于一次 A+B 组合交互中。
    pub fn is_combo_active(&self) -> bool {
        self.combo.is_active()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// 重置全部按钮状态到上电时的初始值，已注册的回调保留。
    pub fn reset(&mut self) {
        self.table.reset();
        self.combo.reset();
    }

    /// 处理一个物理按钮的按下或释放边沿。
    ///
    /// `Down`/`Up` 立即分发；若这次释放完成了双击，`Double` 紧随其后。
    /// 单击要等双击窗口关闭后由扫描确认。
    pub fn on_edge(&mut self, button: ButtonId, pressed: bool, now: Instant) -> Result<(), Error> {
        let button = button.as_edge_source()?;
        self.apply_edge(button, pressed, now);
        Ok(())
    }

    pub(crate) fn apply_edge(&mut self, button: ButtonId, pressed: bool, now: Instant) {
        match self.combo.route(button, pressed) {
            Route::Press(button) => self.press(button, now),
            Route::Release(button) => self.release(button, now),
            Route::Merge { first, second } => self.merge(first, second, now),
            Route::Split {
                released,
                remaining,
            } => self.split(released, remaining, now),
            Route::Redundant => {
                trace!("ignoring repeated edge {:?} pressed={}", button, pressed);
            }
        }
    }

    fn press(&mut self, button: ButtonId, now: Instant) {
        self.table.get_mut(button).begin_hold(now);
        self.emit(button, GestureKind::Down);
    }

    fn release(&mut self, button: ButtonId, now: Instant) {
        let classified = self.finish_hold(button, now);
        self.emit(button, GestureKind::Up);
        if let Some(kind) = classified {
            self.emit(button, kind);
        }
    }

    /// 第二个按钮加入：`first` 正在进行的按住转给 `Combo`。
    fn merge(&mut self, first: ButtonId, second: ButtonId, now: Instant) {
        let first_state = self.table.get_mut(first);
        first_state.in_long_click = false;
        first_state.combo_tail = false;
        let started = min(first_state.press_start, now);

        self.table.get_mut(second).begin_hold(now);
        self.table.get_mut(ButtonId::Combo).begin_hold(started);

        debug!("{:?} joined {:?}, combo started", second, first);
        self.emit(ButtonId::Combo, GestureKind::Down);
    }

    /// 组合中的一个按钮释放：结束 `Combo`，另一个按钮重新开始。
    fn split(&mut self, released: ButtonId, remaining: ButtonId, now: Instant) {
        let released_state = self.table.get_mut(released);
        released_state.held = false;
        released_state.in_long_click = false;
        released_state.combo_tail = false;

        let classified = self.finish_hold(ButtonId::Combo, now);

        let remaining_state = self.table.get_mut(remaining);
        remaining_state.begin_hold(now);
        remaining_state.combo_tail = true;

        debug!("{:?} released, combo ended", released);
        self.emit(ButtonId::Combo, GestureKind::Up);
        if let Some(kind) = classified {
            self.emit(ButtonId::Combo, kind);
        }
        self.emit(remaining, GestureKind::Down);
    }

    /// 结束一次按住并给出释放时应产生的手势（如果有）。只修改状态，不分发。
    fn finish_hold(&mut self, button: ButtonId, now: Instant) -> Option<GestureKind> {
        let config = self.config;
        let state = self.table.get_mut(button);
        state.held = false;
        let hold = now.saturating_duration_since(state.press_start);

        let classified = if hold >= config.short_click {
            // 介于短按与长按之间的释放不产生手势
            state.last_click_end = None;
            None
        } else if state.combo_tail {
            None
        } else if state
            .last_click_end
            .is_some_and(|end| now.saturating_duration_since(end) < config.double_click)
        {
            state.last_click_end = None;
            Some(GestureKind::Double)
        } else if state.in_long_click {
            state.last_click_end = None;
            None
        } else {
            // 上一次点击的窗口已过、但还没等到扫描确认
            let stale = state.last_click_end.replace(now).is_some();
            stale.then_some(GestureKind::Single)
        };

        state.in_long_click = false;
        state.combo_tail = false;
        classified
    }

    /// 周期扫描。
    ///
    /// 对每个身份依次：先确认双击窗口已过的单击，再检查长按。
    /// 持续按住时每隔 `long_click` 重复触发一次 `Long`。
    pub fn on_tick(&mut self, now: Instant) {
        for button in ButtonId::ALL {
            self.rebase(button, now);

            let config = self.config;
            let state = self.table.get_mut(button);
            let single = match state.last_click_end {
                Some(end) if now.saturating_duration_since(end) > config.double_click => {
                    state.last_click_end = None;
                    true
                }
                _ => false,
            };
            if single {
                self.emit(button, GestureKind::Single);
            }

            if !self.combo.owns_hold(button) {
                continue;
            }
            let state = self.table.get_mut(button);
            if now.saturating_duration_since(state.press_start) > config.long_click {
                state.last_click_end = None;
                state.in_long_click = true;
                state.press_start = now;
                self.emit(button, GestureKind::Long);
            }
        }
    }

    /// 读取物理按钮状态，补上遗漏的边沿，然后执行一次扫描。
    pub fn poll<S: PressSource>(&mut self, now: Instant, source: &mut S) {
        for button in ButtonId::PHYSICAL {
            let pressed = source.is_pressed(button);
            if pressed != self.combo.is_pressed(button) {
                warn!("missed edge on {:?}, resyncing to pressed={}", button, pressed);
                self.apply_edge(button, pressed, now);
            }
        }
        self.on_tick(now);
    }

    /// 时钟回退（例如计数回绕）时把记录的时间戳拉回到 `now`，
    /// 避免计时停滞或产生跨越数天的“长按”。
    fn rebase(&mut self, button: ButtonId, now: Instant) {
        let state = self.table.get_mut(button);
        if state.last_click_end.is_some_and(|end| now < end) {
            warn!("clock went backwards on {:?}", button);
            state.last_click_end = Some(now);
        }
        if state.held && now < state.press_start {
            warn!("clock went backwards on {:?}", button);
            state.press_start = now;
        }
    }

    fn emit(&mut self, button: ButtonId, kind: GestureKind) {
        let gesture = Gesture::new(button, kind);
        debug!("gesture {:?}", gesture);
        self.dispatcher.dispatch(gesture);
    }
}

impl<D: Dispatcher + core::fmt::Debug> core::fmt::Debug for ClickMachine<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClickMachine")
            .field("config", &self.config)
            .field("table", &self.table)
            .field("combo", &self.combo)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
