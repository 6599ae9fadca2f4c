#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 提供三维体数据 (超声时间步、灰度图及标签图) 的结构化信息和基础处理算法.
//!
//! 该 crate 目前仅提供 `safe` 接口, 且只产生体数据: 体数据的重采样、注册与显示
//! 由宿主应用通过 [`host`] 中的 trait 注入.
//!
//! # 注意
//!
//! 1. 体数据内部按 `(nz, ny, nx)` 存储, 扁平下标为 `x + nx * (y + ny * z)`;
//!   对外报告的体素个数总是 `(nx, ny, nz)`.
//! 2. 所有可预期的失败均以 [`VolError`] 返回, 不会 panic.
//!
//! # 开发计划
//!
//! ### 掩膜统计 ✅
//!
//! 以标签图中最大的非零标签为前景, 计算平均值、总体标准差和体素个数.
//!
//! 实现位于 `vol-berry/src/stats.rs`.
//!
//! ### 多路合成 ✅
//!
//! 逐体素平均与最大值投影. 平均运算保留了历史输出的操作数顺序
//! (见 [`config::AveragePolicy`]), 同时提供修正后的版本.
//!
//! 开启 `rayon` feature 后提供并行版本.
//!
//! 实现位于 `vol-berry/src/combine.rs`.
//!
//! ### 几何操作 ✅
//!
//! 轴向翻转 (只修改空间变换)、原点重定心、网格一致性检查.
//!
//! 实现位于 `vol-berry/src/geometry.rs`.
//!
//! ### 标签重赋值 ✅
//!
//! 进程内执行, 或通过外部执行器同步执行.
//!
//! 实现位于 `vol-berry/src/threshold.rs`.
//!
//! ### 处理流程 ✅
//!
//! 1. CNR (病灶区域 vs 左右对称区域); ✅
//! 2. 四路合成 (平均 + 最大值投影) 与两路平均; ✅
//! 3. 时间步序列准备 (重定心 + 上下翻转 + 显示窗口). ✅
//!
//! 实现位于 `vol-berry/src/recipe`.
//!
//! ### 显示窗口 ✅
//!
//! 窗位 / 窗宽到 8-bit 灰度值的映射.
//!
//! 实现位于 `vol-berry/src/data/window.rs`.

/// 三维体素个数 `(nx, ny, nz)`, 同时也可用作三维索引 `(x, y, z)`.
pub type Dim3 = (usize, usize, usize);

/// 三维体数据基础数据结构.
mod data;

pub use data::{
    Axis3, AxisFlips, Geometry, NiftiScalar, TransformMatrix, VolumeBuffer, WindowLevel,
};

pub mod config;
pub mod consts;

mod error;

pub use error::{VolError, VolResult};

pub mod combine;
pub mod geometry;
pub mod stats;
pub mod threshold;

pub mod host;
pub mod recipe;

pub mod dataset;
pub mod prelude;
