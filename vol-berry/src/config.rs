//! 运算参数.

use crate::consts::label::{RELABEL_THRESHOLD, SYMMETRIC_LABEL};
use crate::WindowLevel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 多路平均的计算方式.
///
/// 两种方式都在求和之前先将每个操作数除以操作数个数 (整数截断除法),
/// 以避免窄整数类型的中间结果溢出.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AveragePolicy {
    /// 复现历史输出: 操作数不少于 3 个时, 第二个操作数被计入两次,
    /// 最后一个操作数被丢弃. 例如四路输入为 `a/4 + b/4 + b/4 + c/4`.
    /// 两路输入时与 [`AveragePolicy::Corrected`] 完全一致.
    #[default]
    Legacy,

    /// 每个操作数恰好计入一次.
    Corrected,
}

/// 对空序列施加几何变换时的行为.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EmptyInputPolicy {
    /// 什么也不做.
    #[default]
    NoOp,

    /// 返回 `VolError::EmptyInput`.
    Reject,
}

/// 运算参数集合. 各 recipe 从这里读取可调参数.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpsConfig {
    /// 多路平均的计算方式.
    pub average: AveragePolicy,

    /// 对空序列施加翻转变换时的行为.
    pub empty_flip: EmptyInputPolicy,

    /// CNR 计算中对称区域的标签值.
    pub symmetric_label: u8,

    /// relabel 执行器的门限.
    pub relabel_threshold: f64,

    /// 时间步序列的显示窗口.
    pub timestep_window: WindowLevel,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            average: AveragePolicy::Legacy,
            empty_flip: EmptyInputPolicy::NoOp,
            symmetric_label: SYMMETRIC_LABEL,
            relabel_threshold: RELABEL_THRESHOLD,
            timestep_window: WindowLevel::from_timestep_visual(),
        }
    }
}

impl OpsConfig {
    /// 替换平均方式.
    #[inline]
    pub fn with_average(mut self, average: AveragePolicy) -> Self {
        self.average = average;
        self
    }

    /// 替换空序列翻转行为.
    #[inline]
    pub fn with_empty_flip(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_flip = policy;
        self
    }
}
