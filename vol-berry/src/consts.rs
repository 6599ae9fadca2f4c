//! 通用常量.

/// 标签值.
pub mod label {
    /// 对称区域 (左右镜像后的病灶区域) 重新赋予的标签值.
    pub const SYMMETRIC_LABEL: u8 = 25;

    /// relabel 执行器的默认门限. 严格大于该值的体素被改写.
    pub const RELABEL_THRESHOLD: f64 = 0.5;
}

/// 结果体数据的默认名称.
pub mod slot {
    /// 对称标签 (CNR 计算过程中克隆出的标签).
    pub const SYMMETRIC_LABEL: &str = "symmetricLabel";

    /// 四路平均结果.
    pub const AVERAGE: &str = "ts2334";

    /// 四路最大值投影结果.
    pub const PROJECTION: &str = "proj_2345";

    /// 两路平均结果.
    pub const PAIRWISE: &str = "CombinedVolume";
}

/// 时间步序列的最大长度.
pub const TIMESTEP_SERIES_LEN: usize = 8;

/// 多体数据合成时的输入个数.
pub const MULTI_COMBINE_LEN: usize = 4;

/// 比较几何元信息时所用的容差.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;
