//! Outlet header bridge
//!
//! The layout owns a [`HeaderOutlet`] and renders whatever its receiver
//! holds. A page calls [`HeaderOutlet::mount`] when it mounts and publishes
//! through the returned [`HeaderSlot`]. Dropping the slot clears the header,
//! so content never outlives the page that set it.
//!
//! Slots carry the generation they were mounted at. Mounting a new page bumps
//! the generation, which turns every older slot into a no-op: a late drop of
//! page A cannot wipe what page B has already published.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// One element rendered in the header bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HeaderItem {
    Text { text: String },
    Count { label: String, value: u64 },
    /// Button; `id` is reported back to the page on click
    Action { id: String, label: String },
}

/// Content a page injects into the layout header
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderContent {
    pub title: Option<String>,
    pub items: Vec<HeaderItem>,
}

impl HeaderContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Total records: N"
    pub fn total_records(total: u64) -> Self {
        Self::new().with_count("Total records", total)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.items.push(HeaderItem::Text { text: text.into() });
        self
    }

    pub fn with_count(mut self, label: impl Into<String>, value: u64) -> Self {
        self.items.push(HeaderItem::Count {
            label: label.into(),
            value,
        });
        self
    }

    pub fn with_action(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.items.push(HeaderItem::Action {
            id: id.into(),
            label: label.into(),
        });
        self
    }
}

#[derive(Debug)]
struct OutletInner {
    tx: watch::Sender<Option<HeaderContent>>,
    generation: AtomicU64,
}

/// Header region owned by the layout
#[derive(Debug, Clone)]
pub struct HeaderOutlet {
    inner: Arc<OutletInner>,
}

impl Default for HeaderOutlet {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderOutlet {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(OutletInner {
                tx,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Receiver for the layout to render from
    pub fn subscribe(&self) -> watch::Receiver<Option<HeaderContent>> {
        self.inner.tx.subscribe()
    }

    /// What the header currently shows
    pub fn current(&self) -> Option<HeaderContent> {
        self.inner.tx.borrow().clone()
    }

    /// Claim the header for a newly mounted page.
    ///
    /// Clears whatever the previous page left behind.
    pub fn mount(&self) -> HeaderSlot {
        let mut generation = 0;
        // generation only changes under the channel lock
        self.inner.tx.send_modify(|content| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *content = None;
        });
        tracing::trace!(generation, "Header slot mounted");
        HeaderSlot {
            inner: self.inner.clone(),
            generation,
        }
    }
}

/// A page's handle on the header; clears it on drop
#[derive(Debug)]
pub struct HeaderSlot {
    inner: Arc<OutletInner>,
    generation: u64,
}

impl HeaderSlot {
    /// Whether no newer page has mounted since this slot was created
    pub fn is_current(&self) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == self.generation
    }

    /// Publish content. Returns `false` if the slot was superseded.
    pub fn set(&self, content: HeaderContent) -> bool {
        let mut accepted = false;
        self.inner.tx.send_if_modified(|current| {
            if self.inner.generation.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            accepted = true;
            if current.as_ref() == Some(&content) {
                return false;
            }
            *current = Some(content);
            true
        });
        accepted
    }

    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|current| {
            if self.inner.generation.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            current.take().is_some()
        });
    }
}

impl Drop for HeaderSlot {
    fn drop(&mut self) {
        self.clear();
    }
}
