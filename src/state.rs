use embassy_time::Instant;

use crate::gesture::ButtonId;

/// 单个按钮身份的计时与标志记录。
///
/// 同一时刻 `last_click_end` 有值与 `in_long_click` 为真不会同时成立。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    /// 最近一次 `Down` 的时间；长按触发后被重置，用于重复触发。
    pub press_start: Instant,
    /// 等待双击窗口关闭的短按的结束时间。`None` 表示没有待定的点击。
    pub last_click_end: Option<Instant>,
    /// 本次按住已经触发过 `Long`，释放时不再产生单击或双击。
    pub in_long_click: bool,
    /// 按下状态。对 `Combo` 而言表示组合交互正在进行。
    pub held: bool,
    /// 本次按住是组合键拆分后剩下的那个按钮，短按释放不产生手势。
    pub combo_tail: bool,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            press_start: Instant::from_ticks(0),
            last_click_end: None,
            in_long_click: false,
            held: false,
            combo_tail: false,
        }
    }

    /// 开始一次新的按住。
    pub(crate) fn begin_hold(&mut self, at: Instant) {
        self.press_start = at;
        self.held = true;
        self.in_long_click = false;
        self.combo_tail = false;
    }

    pub fn is_pending(&self) -> bool {
        self.last_click_end.is_some()
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}

/// 三个按钮身份的状态表，由 [`ClickMachine`](crate::ClickMachine) 独占。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonStateTable {
    a: ButtonState,
    b: ButtonState,
    combo: ButtonState,
}

impl ButtonStateTable {
    pub const fn new() -> Self {
        Self {
            a: ButtonState::new(),
            b: ButtonState::new(),
            combo: ButtonState::new(),
        }
    }

    pub fn get(&self, button: ButtonId) -> &ButtonState {
        match button {
            ButtonId::A => &self.a,
            ButtonId::B => &self.b,
            ButtonId::Combo => &self.combo,
        }
    }

    pub(crate) fn get_mut(&mut self, button: ButtonId) -> &mut ButtonState {
        match button {
            ButtonId::A => &mut self.a,
            ButtonId::B => &mut self.b,
            ButtonId::Combo => &mut self.combo,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
