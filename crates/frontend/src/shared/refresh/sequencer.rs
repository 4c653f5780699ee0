use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Independently refreshed parts of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    Kpis,
    Trend,
    TopPlatforms,
    RecentSales,
    History,
}

/// Proof that a fetch was started as the `seq`-th request of its widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub widget: Widget,
    pub seq: u64,
}

/// Per-widget request counter.
///
/// Every fetch takes a ticket before it starts; when it resolves, only the
/// holder of the latest ticket may render. Older results are dropped.
#[derive(Debug, Clone, Default)]
pub struct RefreshSequencer {
    latest: Rc<RefCell<HashMap<Widget, u64>>>,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, widget: Widget) -> Ticket {
        let mut latest = self.latest.borrow_mut();
        let seq = latest.entry(widget).or_insert(0);
        *seq += 1;
        Ticket { widget, seq: *seq }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.borrow().get(&ticket.widget).copied() == Some(ticket.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let seq = RefreshSequencer::new();
        let first = seq.begin(Widget::History);
        let other = seq.begin(Widget::Kpis);
        assert!(seq.is_current(&first));

        let second = seq.clone().begin(Widget::History);
        assert!(!seq.is_current(&first));
        assert!(seq.is_current(&second));
        assert!(seq.is_current(&other));
    }
}
