//! Load-more state machine and configuration.

/// How a load-more request is started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Fires as soon as the footer scrolls into view.
    #[default]
    Auto,
    /// Fires only when the user activates the footer hint.
    Manual,
}

/// When the footer row occupies a slot in the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FooterPolicy {
    /// Always reserve the footer row; once exhausted it shows a
    /// "no more data" hint.
    Always,
    /// Reserve the footer only while more data may exist.
    #[default]
    WhileHasMore,
}

impl FooterPolicy {
    pub fn shows_footer(self, has_more: bool) -> bool {
        match self {
            FooterPolicy::Always => true,
            FooterPolicy::WhileHasMore => has_more,
        }
    }
}

/// Configuration for a [`LoadMoreList`](crate::list::LoadMoreList).
///
/// ```ignore
/// let config = LoadMoreConfig {
///     load_mode: LoadMode::Manual,
///     footer_policy: FooterPolicy::Always,
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadMoreConfig {
    pub load_mode: LoadMode,
    pub footer_policy: FooterPolicy,
}

/// Coarse phase derived from [`LoadMoreState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Waiting for the user to reach the footer.
    Idle,
    /// A request is out; no further request may fire.
    Loading,
    /// The host reported there is nothing more to load.
    Exhausted,
}

/// Mutable load-more state owned by one list.
///
/// `is_loading_more` is a latch: it is set when a request fires and only
/// cleared by a finished load or an explicit override. Nothing times it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMoreState {
    has_more: bool,
    is_loading_more: bool,
    last_trigger_position: Option<usize>,
    load_mode: LoadMode,
}

impl LoadMoreState {
    pub fn new(load_mode: LoadMode) -> Self {
        Self {
            has_more: true,
            is_loading_more: false,
            last_trigger_position: None,
            load_mode,
        }
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    /// Row index of the footer when the last request fired.
    pub fn last_trigger_position(&self) -> Option<usize> {
        self.last_trigger_position
    }

    pub fn load_mode(&self) -> LoadMode {
        self.load_mode
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_loading_more {
            LoadPhase::Loading
        } else if self.has_more {
            LoadPhase::Idle
        } else {
            LoadPhase::Exhausted
        }
    }

    /// Whether a request may start right now.
    pub fn can_trigger(&self) -> bool {
        self.has_more && !self.is_loading_more
    }

    pub(crate) fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_loading_more = loading;
    }

    pub(crate) fn set_load_mode(&mut self, mode: LoadMode) {
        self.load_mode = mode;
    }

    pub(crate) fn begin_loading(&mut self, trigger_position: usize) {
        self.is_loading_more = true;
        self.last_trigger_position = Some(trigger_position);
    }

    pub(crate) fn finish_loading(&mut self, has_more: bool) {
        self.has_more = has_more;
        self.is_loading_more = false;
    }
}

impl Default for LoadMoreState {
    fn default() -> Self {
        Self::new(LoadMode::default())
    }
}

/// Errors from the public load-more entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadMoreError {
    /// `notify_load_finished` was called before any adapter was set.
    #[error("no adapter set: call set_adapter before notify_load_finished")]
    NoAdapter,
}
