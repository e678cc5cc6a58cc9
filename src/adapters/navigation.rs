use crate::domain::ports::Navigator;
use std::sync::Mutex;

/// Navigator for headless callers: logs each route and keeps the history.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    history: Mutex<Vec<String>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!("🧭 Navigating to {}", route);
        if let Ok(mut history) = self.history.lock() {
            history.push(route.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_routes_in_order() {
        let navigator = LoggingNavigator::new();
        navigator.navigate("myRentals");
        navigator.navigate("home");
        assert_eq!(navigator.history(), vec!["myRentals", "home"]);
    }
}
