use log::{ error, info };
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: &str) {
        self.notify(Notice { level: NoticeLevel::Success, message: message.to_string() });
    }

    fn info(&self, message: &str) {
        self.notify(Notice { level: NoticeLevel::Info, message: message.to_string() });
    }

    fn error(&self, message: &str) {
        self.notify(Notice { level: NoticeLevel::Error, message: message.to_string() });
    }
}

/// Writes every notice to the log and keeps it until drained.
#[derive(Default)]
pub struct LogNotifier {
    history: Mutex<Vec<Notice>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.history
            .lock()
            .map(|mut h| std::mem::take(&mut *h))
            .unwrap_or_default()
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => info!("{}", notice.message),
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(notice);
        }
    }
}
