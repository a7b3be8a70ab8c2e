use futures::future::BoxFuture;
use std::future::Future;

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// The playground needs only a handful of effects: deliver a message now,
/// run a future and deliver its result later, or quit.
///
/// # Examples
///
/// ```rust,ignore
/// // Submit a run; the response comes back as Msg::RunFinished.
/// let cmd = Command::perform(engine.execute(request), move |outcome| {
///     Msg::RunFinished(ticket, outcome)
/// });
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Quit,
    Future(BoxFuture<'static, Msg>),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// Do nothing.
    pub fn none() -> Self {
        Self::from_inner(CommandInner::None)
    }

    /// Await `future` off the update loop and deliver `map(output)`.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::from_inner(CommandInner::Future(Box::pin(async move { map(future.await) })))
    }

    /// Deliver `msg` to `update` as soon as the current update returns,
    /// ahead of any terminal event still waiting to be read.
    pub fn message(msg: Msg) -> Self {
        Self::from_inner(CommandInner::Message(msg))
    }

    /// Stop the program after this update.
    pub fn quit() -> Self {
        Self::from_inner(CommandInner::Quit)
    }

    /// Lift a child component's command into the parent's message type.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl FnOnce(Msg) -> NewMsg + Send + 'static,
    ) -> Command<NewMsg> {
        let inner = match self.inner {
            CommandInner::None => CommandInner::None,
            CommandInner::Quit => CommandInner::Quit,
            CommandInner::Message(msg) => CommandInner::Message(f(msg)),
            CommandInner::Future(fut) => CommandInner::Future(Box::pin(async move { f(fut.await) })),
        };
        Command { inner }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// Whether this command stops the program.
    pub fn is_quit(&self) -> bool {
        matches!(self.inner, CommandInner::Quit)
    }

    /// The message, if this command delivers one immediately.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }

    fn from_inner(inner: CommandInner<Msg>) -> Self {
        Command { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_none() {
        let cmd: Command<()> = Command::none();
        assert!(cmd.is_none());
        assert!(cmd.into_message().is_none());
    }

    #[test]
    fn message_is_delivered_as_is() {
        let cmd: Command<i32> = Command::message(42);
        assert!(!cmd.is_none());
        assert_eq!(cmd.into_message(), Some(42));
    }

    #[test]
    fn map_wraps_message() {
        let cmd: Command<i32> = Command::message(7);
        let mapped: Command<String> = cmd.map(|n| n.to_string());
        assert_eq!(mapped.into_message().as_deref(), Some("7"));
    }

    #[test]
    fn map_keeps_quit_and_none() {
        assert!(Command::<i32>::quit().map(|n| n + 1).is_quit());
        assert!(Command::<i32>::none().map(|n| n + 1).is_none());
    }

    #[tokio::test]
    async fn map_applies_after_future_resolves() {
        let cmd: Command<i32> = Command::perform(async { 20 }, |n| n + 1);
        let mapped: Command<String> = cmd.map(|n| format!("#{n}"));
        match mapped.inner {
            CommandInner::Future(fut) => assert_eq!(fut.await, "#21"),
            _ => panic!("expected a future"),
        }
    }
}
