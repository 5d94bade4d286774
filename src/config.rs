use embassy_time::Duration;

/// 周期扫描的间隔（毫秒）。
pub const SCAN_INTERVAL_MS: u64 = 100;
/// 按住超过该时长（毫秒）即触发长按。
pub const LONG_CLICK_MS: u64 = 800;
/// 短于该时长（毫秒）的按下才可能成为单击或双击。
pub const SHORT_CLICK_MS: u64 = 500;
/// 双击窗口（毫秒）。
pub const DOUBLE_CLICK_MS: u64 = 300;

/// 点击识别的时间参数。
///
/// 在创建 [`ClickMachine`](crate::ClickMachine) 与 [`ClickRunner`](crate::ClickRunner)
/// 时传入，之后不再修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickConfig {
    /// 周期扫描的间隔。
    ///
    /// 单击的最终确认与长按的触发都只在扫描时发生，
    /// 因此手势边界的精度为一个扫描间隔。
    pub scan_interval: Duration,

    /// 触发长按所需的持续按下时间。
    ///
    /// 持续按住时每隔这么久会再次触发一次 `Long`。
    pub long_click: Duration,

    /// 短按阈值。
    ///
    /// 按下时长不小于该值、又没有触发长按的释放不会产生任何手势。
    pub short_click: Duration,

    /// 双击窗口。
    ///
    /// 上一次短按释放后，在此窗口内再次完成短按即为双击；
    /// 窗口过去仍无第二次点击，则由扫描确认为单击。
    pub double_click: Duration,
}

impl Default for ClickConfig {
    /// 默认配置。
    ///
    /// - 扫描间隔: 100ms
    /// - 长按阈值: 800ms
    /// - 短按阈值: 500ms
    /// - 双击窗口: 300ms
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(SCAN_INTERVAL_MS),
            long_click: Duration::from_millis(LONG_CLICK_MS),
            short_click: Duration::from_millis(SHORT_CLICK_MS),
            double_click: Duration::from_millis(DOUBLE_CLICK_MS),
        }
    }
}
