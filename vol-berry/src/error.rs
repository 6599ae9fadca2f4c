//! 运行时错误.

use crate::Dim3;
use thiserror::Error;

/// 体数据操作的运行时错误.
///
/// 所有引擎级错误都会被立即返回给调用方, 不做重试, 也不替换为默认值.
#[derive(Debug, Error)]
pub enum VolError {
    /// 参与运算的体数据形状不一致. `(期望形状, 实际形状)`, 均为 `(nx, ny, nz)`.
    #[error("dimension mismatch: expected {0:?}, found {1:?}")]
    DimensionMismatch(Dim3, Dim3),

    /// 掩膜中没有任何前景体素.
    #[error("mask selects no voxel")]
    EmptyMask,

    /// 比值计算的分母 (标准差) 为 0.
    #[error("division by zero: reference standard deviation is 0")]
    DivisionByZero,

    /// 源体数据没有已分配的标量数据. 参数为源体数据名称.
    #[error("volume `{0}` has no scalar data")]
    IncompatibleSource(String),

    /// 序列中存在未能解析的成员. 参数为所有缺失成员的标识.
    #[error("incomplete series, missing: {}", .missing.join(", "))]
    IncompleteSeries {
        /// 缺失成员的标识, 按序列顺序排列.
        missing: Vec<String>,
    },

    /// 变换作用于空的体数据序列.
    #[error("transform applied to no volume")]
    EmptyInput,

    /// 操作数个数不足.
    #[error("too few operands: at least {required} required, {found} given")]
    TooFewOperands {
        /// 最少需要的个数.
        required: usize,
        /// 实际给出的个数.
        found: usize,
    },

    /// 序列成员过多.
    #[error("series too long: at most {max} members, {found} given")]
    SeriesTooLong {
        /// 允许的最大成员数.
        max: usize,
        /// 实际成员数.
        found: usize,
    },

    /// 外部 relabel 执行器不可达.
    #[error("relabel executor unreachable: {0}")]
    ExecutorUnreachable(String),

    /// 外部 relabel 执行器已运行, 但报告了应用层错误.
    #[error("relabel executor failed ({code}): {message}")]
    ExecutorFailed {
        /// 执行器返回的状态码.
        code: i32,
        /// 执行器给出的错误信息.
        message: String,
    },

    /// 读取 nifti 文件错误.
    #[error(transparent)]
    Nifti(#[from] nifti::NiftiError),

    /// 底层数组形状错误.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// 体数据操作结果.
pub type VolResult<T> = Result<T, VolError>;
