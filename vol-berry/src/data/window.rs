/// 显示窗口, 包含窗位 (level) 和窗宽 (window width).
///
/// 该窗口是只读的. 若要修改窗口参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowLevel {
    level: f64,
    width: f64,
}

impl WindowLevel {
    /// 构建显示窗口.
    ///
    /// `level` 和 `width` 必须在合理范围内, 否则返回 `None`.
    pub fn new(level: f64, width: f64) -> Option<WindowLevel> {
        if (-1e5..=1e5).contains(&level) && 0.0 < width && width <= 1e5 {
            Some(Self { level, width })
        } else {
            None
        }
    }

    /// 构建一个便于浏览超声时间步体数据的显示窗口. 该窗口的窗位为
    /// 50, 窗宽为 110.
    #[inline]
    pub const fn from_timestep_visual() -> WindowLevel {
        Self {
            level: 50.0,
            width: 110.0,
        }
    }

    /// 窗下限.
    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.level - self.width / 2.0
    }

    /// 窗上限.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.level + self.width / 2.0
    }

    /// 窗位.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// 窗宽.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// 求在当前窗口设置下, 体素值 `v` 对应的 8-bit 显示灰度 (0 <= value <= 255).
    ///
    /// 如果 `v` 无意义 (如 inf, NaN), 则返回 `None`.
    pub fn eval(&self, v: f64) -> Option<u8> {
        if !v.is_finite() {
            return None;
        }
        let lb = self.lower_bound();
        if v <= lb {
            Some(u8::MIN)
        } else if v >= self.upper_bound() {
            Some(u8::MAX)
        } else {
            // 255, not 256.
            Some((((v - lb) / self.width) * 255.0) as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WindowLevel;

    #[test]
    fn test_window_invalid_input() {
        assert!(WindowLevel::new(0.0, -1.0).is_none());
        assert!(WindowLevel::new(0.0, 0.0).is_none());
        assert!(WindowLevel::new(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_timestep_window() {
        // [-5, 105]
        let w = WindowLevel::from_timestep_visual();
        assert_eq!(w.lower_bound(), -5.0);
        assert_eq!(w.upper_bound(), 105.0);
        assert_eq!(Some(w), WindowLevel::new(50.0, 110.0));

        assert_eq!(w.eval(f64::NAN), None);
        assert_eq!(w.eval(-100.0), Some(0));
        assert_eq!(w.eval(-5.0), Some(0));
        assert_eq!(w.eval(50.0), Some(127));
        assert_eq!(w.eval(104.99), Some(254));
        assert_eq!(w.eval(105.0), Some(255));
        assert_eq!(w.eval(f64::MAX), Some(255));
    }
}
