#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use x_backup::scroll::SCROLL_CONTAINER_SELECTOR;
use x_backup::{BackupError, ElementNode, Page, Result, RunKind, RunManager};

type Render = Box<dyn Fn(usize) -> Vec<ElementNode> + Send + Sync>;
type Height = Box<dyn Fn(usize) -> f64 + Send + Sync>;
type Outage = Box<dyn Fn(usize) -> bool + Send + Sync>;

/// In-memory page whose content is a function of how far it has been scrolled
pub struct FakePage {
    url: String,
    selector: String,
    has_container: bool,
    render: Render,
    height: Height,
    scrolls: Mutex<usize>,
    cancel_at: Option<(usize, Arc<RunManager>)>,
    outage: Outage,
    queries_fail: bool,
}

impl FakePage {
    /// `render(scrolls)` returns every node matching `selector` after `scrolls` scroll steps
    pub fn new(selector: &str, render: impl Fn(usize) -> Vec<ElementNode> + Send + Sync + 'static) -> Self {
        Self {
            url: "https://x.com/home".to_string(),
            selector: selector.to_string(),
            has_container: true,
            render: Box::new(render),
            height: Box::new(|_| 1000.0),
            scrolls: Mutex::new(0),
            cancel_at: None,
            outage: Box::new(|_| false),
            queries_fail: false,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn without_container(mut self) -> Self {
        self.has_container = false;
        self
    }

    pub fn height(mut self, height: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        self.height = Box::new(height);
        self
    }

    /// Request a bookmark stop once the page has been scrolled `scrolls` times
    pub fn cancel_at(mut self, scrolls: usize, runs: Arc<RunManager>) -> Self {
        self.cancel_at = Some((scrolls, runs));
        self
    }

    /// Every call fails while `down(scrolls)` holds, as if the tab had crashed
    pub fn down_while(mut self, down: impl Fn(usize) -> bool + Send + Sync + 'static) -> Self {
        self.outage = Box::new(down);
        self
    }

    /// `query_all` always fails; heights and scrolling still work
    pub fn failing_queries(mut self) -> Self {
        self.queries_fail = true;
        self
    }

    pub fn scrolls(&self) -> usize {
        *self.scrolls.lock().unwrap()
    }

    fn check_up(&self) -> Result<()> {
        if (self.outage)(self.scrolls()) {
            return Err(BackupError::EvaluationFailed("target closed".to_string()));
        }
        Ok(())
    }
}

impl Page for FakePage {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementNode>> {
        self.check_up()?;
        if self.queries_fail {
            return Err(BackupError::EvaluationFailed("query failed".to_string()));
        }
        if selector != self.selector {
            return Ok(Vec::new());
        }
        Ok((self.render)(self.scrolls()))
    }

    fn scroll_by(&self, _pixels: i64) -> Result<()> {
        let scrolls = {
            let mut scrolls = self.scrolls.lock().unwrap();
            *scrolls += 1;
            *scrolls
        };
        if let Some((at, runs)) = &self.cancel_at {
            if scrolls == *at {
                runs.request_cancel(RunKind::Bookmarks);
            }
        }
        self.check_up()
    }

    fn scroll_height(&self, selector: &str) -> Result<Option<f64>> {
        self.check_up()?;
        if !self.has_container || selector != SCROLL_CONTAINER_SELECTOR {
            return Ok(None);
        }
        Ok(Some((self.height)(self.scrolls())))
    }

    fn current_url(&self) -> Result<String> {
        self.check_up()?;
        Ok(self.url.clone())
    }
}

pub fn follow_button(id: usize, handle: &str) -> ElementNode {
    ElementNode::new("button")
        .with_attribute("data-testid", format!("{}-unfollow", id))
        .with_attribute("aria-label", format!("Following {}", handle))
}

pub fn bookmark_link(user: &str, status: usize) -> ElementNode {
    ElementNode::new("a").with_attribute("href", format!("/{}/status/{}/analytics", user, status))
}

pub fn avatar(username: &str) -> ElementNode {
    ElementNode::new("div").with_attribute("data-testid", format!("UserAvatar-Container-{}", username))
}
