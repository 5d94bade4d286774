//! A+B 组合键检测。
//!
//! 采用并发状态跟踪：直接记录两个物理按钮的按下状态。
//! 先按下的按钮开始自己的交互；在它仍按住时按下另一个按钮，
//! 两者合并为一次 `Combo` 交互，之后的手势都归属于 `Combo`。
//! 组合中任意一个按钮先释放即结束 `Combo` 交互，
//! 仍按住的那个按钮立即开始一次新的交互。

use crate::gesture::ButtonId;

/// 一次物理边沿对应的处理方式。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// 单独按下，按自身身份开始交互。
    Press(ButtonId),
    /// 第二个按钮加入，`first` 的交互并入 `Combo`。
    Merge { first: ButtonId, second: ButtonId },
    /// 单独释放，按自身身份结束交互。
    Release(ButtonId),
    /// 组合中的 `released` 先释放；`Combo` 结束，`remaining` 开始新的交互。
    Split { released: ButtonId, remaining: ButtonId },
    /// 与已知状态相同的边沿，没有发生转换。
    Redundant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ComboDetector {
    held_a: bool,
    held_b: bool,
    active: bool,
}

impl ComboDetector {
    pub(crate) const fn new() -> Self {
        Self {
            held_a: false,
            held_b: false,
            active: false,
        }
    }

    /// 物理按钮当前的按下状态。`Combo` 为两者都按下。
    pub(crate) fn is_pressed(&self, button: ButtonId) -> bool {
        match button {
            ButtonId::A => self.held_a,
            ButtonId::B => self.held_b,
            ButtonId::Combo => self.held_a && self.held_b,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// 该身份此刻是否拥有一次正在进行的按住，用于长按判定。
    ///
    /// 组合进行时两个物理按钮的按住都归 `Combo` 所有。
    pub(crate) fn owns_hold(&self, button: ButtonId) -> bool {
        match button {
            ButtonId::Combo => self.active,
            physical => self.is_pressed(physical) && !self.active,
        }
    }

    /// 记录一次物理边沿并决定其归属。
    pub(crate) fn route(&mut self, button: ButtonId, pressed: bool) -> Route {
        let (held, other) = match button {
            ButtonId::A => (&mut self.held_a, ButtonId::B),
            ButtonId::B => (&mut self.held_b, ButtonId::A),
            ButtonId::Combo => return Route::Redundant,
        };

        if *held == pressed {
            return Route::Redundant;
        }
        *held = pressed;
        let other_held = self.is_pressed(other);

        match (pressed, other_held, self.active) {
            (true, true, _) => {
                self.active = true;
                Route::Merge {
                    first: other,
                    second: button,
                }
            }
            (true, false, _) => Route::Press(button),
            (false, _, true) => {
                self.active = false;
                Route::Split {
                    released: button,
                    remaining: other,
                }
            }
            (false, _, false) => Route::Release(button),
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
