//! Scripted backend for driving windows and loops in tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glfw::WindowEvent;

use super::backend::WindowBackend;

/// Observable side effects of a [`HeadlessBackend`]
#[derive(Debug, Default)]
pub(crate) struct HeadlessLog {
    pub swaps: u32,
    pub polls: u32,
    pub titles: Vec<String>,
}

/// Test double with a scripted clock, scripted events and close requests
///
/// Each `poll_events` call advances the clock by `frame_step`, pops the next
/// batch of scripted events, and raises the close flag when the poll count
/// reaches `close_after_polls`.
pub(crate) struct HeadlessBackend {
    size: (u32, u32),
    title: String,
    now: f64,
    frame_step: f64,
    should_close: bool,
    close_after_polls: Option<u32>,
    pending: VecDeque<Vec<WindowEvent>>,
    log: Rc<RefCell<HeadlessLog>>,
}

impl HeadlessBackend {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            title: String::from("headless"),
            now: 0.0,
            frame_step: 1.0 / 60.0,
            should_close: false,
            close_after_polls: None,
            pending: VecDeque::new(),
            log: Rc::new(RefCell::new(HeadlessLog::default())),
        }
    }

    pub(crate) fn with_frame_step(mut self, seconds: f64) -> Self {
        self.frame_step = seconds;
        self
    }

    pub(crate) fn close_after(mut self, polls: u32) -> Self {
        self.close_after_polls = Some(polls);
        self
    }

    /// Queue one batch of events per future poll, in order
    pub(crate) fn with_events(mut self, batches: Vec<Vec<WindowEvent>>) -> Self {
        self.pending = batches.into();
        self
    }

    pub(crate) fn log(&self) -> Rc<RefCell<HeadlessLog>> {
        Rc::clone(&self.log)
    }
}

impl WindowBackend for HeadlessBackend {
    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        let polls = {
            let mut log = self.log.borrow_mut();
            log.polls += 1;
            log.polls
        };
        self.now += self.frame_step;
        if self.close_after_polls == Some(polls) {
            self.should_close = true;
        }

        let now = self.now;
        self.pending
            .pop_front()
            .unwrap_or_default()
            .into_iter()
            .map(|event| (now, event))
            .collect()
    }

    fn swap_buffers(&mut self) {
        self.log.borrow_mut().swaps += 1;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.log.borrow_mut().titles.push(title.to_string());
    }

    fn time(&self) -> f64 {
        self.now
    }

    fn gl(&self) -> Option<&glow::Context> {
        None
    }
}
