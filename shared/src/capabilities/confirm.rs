use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

/// Yes/no prompt shown by the shell before destructive actions.
#[derive(Capability)]
pub struct Confirm<Ev> {
    context: CapabilityContext<ConfirmOperation, Ev>,
}

impl<Ev> Confirm<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ConfirmOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn ask<F>(&self, message: impl Into<String>, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        let operation = ConfirmOperation::Ask {
            message: message.into(),
        };
        self.context.spawn(async move {
            let confirmed = context.request_from_shell(operation).await;
            context.update_app(make_event(confirmed));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfirmOperation {
    Ask { message: String },
}

impl Operation for ConfirmOperation {
    type Output = bool;
}
