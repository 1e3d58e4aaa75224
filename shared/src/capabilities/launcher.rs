use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asks the OS to open a URL in another application.
pub struct Launcher<Ev> {
    context: CapabilityContext<LaunchOperation, Ev>,
}

impl<Ev> Capability<Ev> for Launcher<Ev> {
    type Operation = LaunchOperation;
    type MappedSelf<MappedEv> = Launcher<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Launcher::new(self.context.map_event(f))
    }
}

impl<Ev> Launcher<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LaunchOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn open_url<F>(&self, url: impl Into<String>, make_event: F)
    where
        F: FnOnce(LaunchResult) -> Ev + Send + 'static,
    {
        let operation = LaunchOperation::OpenUrl { url: url.into() };
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LaunchOperation {
    OpenUrl { url: String },
}

impl Operation for LaunchOperation {
    type Output = LaunchResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LaunchError {
    #[error("no application can open this link")]
    NoHandler,

    #[error("launch failed: {message}")]
    Failed { message: String },
}

pub type LaunchResult = Result<(), LaunchError>;
