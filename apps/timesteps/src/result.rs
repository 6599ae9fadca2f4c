//! 运行结果.

use std::io::{self, Write};
use std::time::Duration;

use vol_berry::WindowLevel;

/// 单个病人时间步序列的准备结果.
pub struct SeriesResult {
    pub patient: String,
    pub shown: Vec<(String, WindowLevel)>,
    pub elapsed: Duration,
}

impl SeriesResult {
    /// 将结果写进 `w` 中.
    fn describe_into<W: Write>(&self, w: &mut W) -> io::Result<()> {
        const S4: &str = "    ";

        writeln!(w, "Patient `{}`:", self.patient)?;
        for (name, window) in self.shown.iter() {
            writeln!(
                w,
                "{S4}{name}: level {}, width {}",
                window.level(),
                window.width()
            )?;
        }
        write!(w, "{S4}Prepared in {} ms", self.elapsed.as_millis())?;
        Ok(())
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        let mut out = io::stdout().lock();
        let _ = utils::sep_to(&mut out);
        let _ = self.describe_into(&mut out);
        let _ = writeln!(out);
        let _ = utils::sep_to(&mut out);
    }
}
