use std::io::Write;

use tracing::debug;

use crate::ui::view::FormView;

/// 终端界面
///
/// 错误、提示直接写到输出流；滚动和跳转只能以文字提示代替。
pub struct TerminalView {
    out: Box<dyn Write + Send>,
}

impl TerminalView {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn line(&mut self, text: &str) {
        // 终端写失败时界面已不可用，只记录不中断
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            debug!("终端输出失败: {}", e);
        }
    }
}

impl FormView for TerminalView {
    fn show_error(&mut self, target: &str, message: &str) {
        self.line(&format!("  ✗ {}: {}", target, message));
    }

    fn clear_error(&mut self, _target: &str) {}

    fn scroll_into_view(&mut self, target: &str) {
        self.line(&format!("  → 请先修改: {}", target));
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line("⏳ 正在提交...");
        }
    }

    fn alert(&mut self, message: &str) {
        self.line(&format!("⚠️ {}", message));
    }

    fn navigate(&mut self, location: &str) {
        self.line(&format!("✅ 提交成功，跳转到 {}", location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_terminal_view_writes_errors_and_alerts() {
        let buffer = SharedBuffer::default();
        let mut view = TerminalView::new(Box::new(buffer.clone()));

        view.show_error("email", "Please enter a valid email address");
        view.alert("Sorry");
        view.navigate("success.html");

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("email: Please enter a valid email address"));
        assert!(output.contains("⚠️ Sorry"));
        assert!(output.contains("success.html"));
    }
}
