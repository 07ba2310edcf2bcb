//! Blocking user-dialog contracts (confirmation prompts and notices).

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`DialogService`].
pub type DialogFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for modal yes/no prompts and user-visible notices.
pub trait DialogService {
    /// Asks the user a yes/no question. Resolves to `true` only on an explicit yes.
    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool>;

    /// Shows a notice the user must acknowledge.
    fn alert<'a>(&'a self, message: &'a str) -> DialogFuture<'a, ()>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Dialog service for headless targets: declines every prompt and drops notices.
pub struct NoopDialogService;

impl DialogService for NoopDialogService {
    fn confirm<'a>(&'a self, _message: &'a str) -> DialogFuture<'a, bool> {
        Box::pin(async { false })
    }

    fn alert<'a>(&'a self, _message: &'a str) -> DialogFuture<'a, ()> {
        Box::pin(async {})
    }
}

#[derive(Debug, Default)]
struct ScriptedDialogs {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
    alerts: Vec<String>,
}

#[derive(Debug, Clone, Default)]
/// Dialog service answering prompts from a queue and recording everything shown.
///
/// An empty answer queue declines. Clones share the same script and transcript.
pub struct ScriptedDialogService {
    inner: Rc<RefCell<ScriptedDialogs>>,
}

impl ScriptedDialogService {
    /// Queues the answer for the next confirmation prompt.
    pub fn push_answer(&self, answer: bool) {
        self.inner.borrow_mut().answers.push_back(answer);
    }

    /// Returns every confirmation message shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.inner.borrow().prompts.clone()
    }

    /// Returns every notice shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.inner.borrow().alerts.clone()
    }
}

impl DialogService for ScriptedDialogService {
    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.prompts.push(message.to_string());
            inner.answers.pop_front().unwrap_or(false)
        })
    }

    fn alert<'a>(&'a self, message: &'a str) -> DialogFuture<'a, ()> {
        Box::pin(async move {
            self.inner.borrow_mut().alerts.push(message.to_string());
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn scripted_dialogs_answer_in_order_then_decline() {
        let dialogs = ScriptedDialogService::default();
        dialogs.push_answer(true);

        assert!(block_on(dialogs.confirm("first?")));
        assert!(!block_on(dialogs.confirm("second?")));
        block_on(dialogs.alert("done"));

        assert_eq!(dialogs.prompts(), vec!["first?", "second?"]);
        assert_eq!(dialogs.alerts(), vec!["done"]);
    }

    #[test]
    fn noop_dialogs_decline() {
        assert!(!block_on(NoopDialogService.confirm("delete?")));
    }
}
