use core::fmt;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// 原始编号不对应任何按钮身份。
    InvalidIdentity(u8),
    /// 边沿只能来自物理按钮，`Combo` 没有硬件边沿。
    ComboEdge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidIdentity(raw) => write!(f, "invalid button identity {}", raw),
            Error::ComboEdge => f.write_str("the A+B combo has no hardware edges"),
        }
    }
}

impl core::error::Error for Error {}
