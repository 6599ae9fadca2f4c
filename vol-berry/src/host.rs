//! 宿主应用需要提供的协作接口.
//!
//! 本 crate 只产生体数据, 不负责体数据的解析、重采样、注册与显示.
//! 这些工作通过以下 trait 显式注入到各 recipe 中.

use std::collections::HashMap;

use crate::{Geometry, VolError, VolResult, VolumeBuffer, WindowLevel};

/// 将名称/标识解析为体数据.
pub trait VolumeResolver<T> {
    /// 解析 `id`. 无法解析时返回 `None`.
    fn resolve(&self, id: &str) -> Option<VolumeBuffer<T>>;
}

/// 将体数据重采样到给定的参考网格.
pub trait Aligner<T> {
    /// 将 `moving` 重采样到 `reference` 描述的网格上, 返回新的体数据.
    fn resample(
        &self,
        moving: &VolumeBuffer<T>,
        reference: &Geometry,
    ) -> VolResult<VolumeBuffer<T>>;
}

/// 持久化 / 注册计算结果.
pub trait CommitSink<T> {
    /// 将 `buffer` 存入 `slot`.
    fn commit(&mut self, slot: &str, buffer: VolumeBuffer<T>) -> VolResult<()>;
}

/// 内存中的结果槽位, 同名槽位会被覆盖.
impl<T> CommitSink<T> for HashMap<String, VolumeBuffer<T>> {
    fn commit(&mut self, slot: &str, buffer: VolumeBuffer<T>) -> VolResult<()> {
        self.insert(slot.to_string(), buffer);
        Ok(())
    }
}

/// 为体数据配置显示窗口.
pub trait DisplayConfigurator<T> {
    /// 以 `window` 显示 `buffer`.
    fn configure(&mut self, buffer: &VolumeBuffer<T>, window: WindowLevel) -> VolResult<()>;
}

/// 外部 relabel 执行器的错误.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorError {
    /// 执行器不可达 (未能启动或连接).
    Unreachable(String),

    /// 执行器已运行, 但报告了应用层错误. `(状态码, 错误信息)`.
    Failed(i32, String),
}

impl From<ExecutorError> for VolError {
    fn from(e: ExecutorError) -> Self {
        match e {
            ExecutorError::Unreachable(why) => VolError::ExecutorUnreachable(why),
            ExecutorError::Failed(code, message) => VolError::ExecutorFailed { code, message },
        }
    }
}

/// 一次 relabel 调用的参数. 结果原地写回 `input`, `output_slot` 为结果槽位名称.
#[derive(Debug)]
pub struct RelabelRequest<'a, T> {
    /// 输入 (同时也是输出) 标签图.
    pub input: &'a mut VolumeBuffer<T>,

    /// 输出槽位名称.
    pub output_slot: &'a str,

    /// 严格大于该门限的体素被改写.
    pub threshold: f64,

    /// 改写后的值.
    pub above_value: T,
}

/// 同步的 relabel 执行器.
///
/// 调用会阻塞直到执行器报告完成, 没有超时或取消机制;
/// 需要这些语义的调用方应自行包装.
pub trait RelabelExecutor<T> {
    /// 执行 relabel, 返回被改写的体素个数.
    fn execute(&self, request: RelabelRequest<'_, T>) -> Result<usize, ExecutorError>;
}
