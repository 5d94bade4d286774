use crate::error::Error;

/// 按钮身份。
///
/// `A` 和 `B` 是两个物理按钮；`Combo` 是两者同时按下时的虚拟按钮，
/// 只作为手势的归属目标，从不产生自己的硬件边沿。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    A,
    B,
    Combo,
}

impl ButtonId {
    /// 全部三个身份，按扫描顺序排列。
    pub const ALL: [ButtonId; 3] = [ButtonId::A, ButtonId::B, ButtonId::Combo];

    /// 两个物理按钮。
    pub const PHYSICAL: [ButtonId; 2] = [ButtonId::A, ButtonId::B];

    pub fn is_physical(self) -> bool {
        !matches!(self, ButtonId::Combo)
    }

    /// 作为边沿来源使用：只有物理按钮有硬件边沿。
    pub fn as_edge_source(self) -> Result<Self, Error> {
        if self.is_physical() {
            Ok(self)
        } else {
            Err(Error::ComboEdge)
        }
    }
}

/// 从集成层的原始编号转换：0 = A，1 = B，2 = A+B。
impl TryFrom<u8> for ButtonId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ButtonId::A),
            1 => Ok(ButtonId::B),
            2 => Ok(ButtonId::Combo),
            other => Err(Error::InvalidIdentity(other)),
        }
    }
}

/// 手势种类。
///
/// `Down`/`Up` 是原始的按下/释放通知；`Single`、`Double`、`Long`
/// 是识别后的手势，一次按下-释放过程最多产生其中之一。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Down,
    Up,
    Single,
    Double,
    Long,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::Down,
        GestureKind::Up,
        GestureKind::Single,
        GestureKind::Double,
        GestureKind::Long,
    ];
}

/// 一次分发的内容：哪个按钮、什么手势。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gesture {
    pub button: ButtonId,
    pub kind: GestureKind,
}

impl Gesture {
    pub const fn new(button: ButtonId, kind: GestureKind) -> Self {
        Self { button, kind }
    }
}
