use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait, following the [Elm Architecture].
///
/// The runtime drives an **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the initial state, typically with the
///    first page of rows, and may return a [`Command`].
/// 2. [`view`](Model::view) renders the current state.
/// 3. Terminal events and timers arrive as messages through
///    [`Subscription`]s.
/// 4. [`update`](Model::update) handles each message and may return further
///    commands, e.g. a page fetch after a load-more request.
///
/// # Example
///
/// ```rust,ignore
/// struct Feed { list: LoadMoreList<VecAdapter<String>> }
///
/// impl Model for Feed {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) { /* ... */ }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::List(list::Message::LoadMore(_)) => {
///                 Command::perform(fetch_page(self.page + 1), Msg::PageLoaded)
///             }
///             Msg::List(m) => self.list.update(m).map(Msg::List),
///             Msg::PageLoaded(rows) => { /* append, notify_load_finished */ }
///         }
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.list.view(frame, frame.area());
///     }
/// }
/// ```
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    ///
    /// After `update` returns, the runtime re-renders and reconciles
    /// [`subscriptions`](Model::subscriptions).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Should be a pure function of `&self`.
    fn view(&self, frame: &mut Frame);

    /// Declare active subscriptions. Called after every update.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
