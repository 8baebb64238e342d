use std::path::PathBuf;
use std::sync::Arc;

use crate::package::Package;

/// Payload of the package lifecycle events.
#[derive(Debug, Clone)]
pub struct PackageOperationEvent {
    pub package: Arc<Package>,
    pub install_path: PathBuf,
    /// Set by an `installing`/`uninstalling` listener to skip this package.
    pub cancel: bool,
}

impl PackageOperationEvent {
    pub fn new(package: Arc<Package>, install_path: PathBuf) -> Self {
        Self {
            package,
            install_path,
            cancel: false,
        }
    }
}

/// Observer registered on a package or project manager.
#[cfg_attr(test, mockall::automock)]
pub trait PackageEventListener {
    fn installing(&mut self, _event: &mut PackageOperationEvent) {}
    fn installed(&mut self, _event: &PackageOperationEvent) {}
    fn uninstalling(&mut self, _event: &mut PackageOperationEvent) {}
    fn uninstalled(&mut self, _event: &PackageOperationEvent) {}
}

/// Registered listeners, fired in registration order.
#[derive(Default)]
pub(crate) struct Listeners<'a> {
    listeners: Vec<Box<dyn PackageEventListener + 'a>>,
}

impl<'a> Listeners<'a> {
    pub(crate) fn push(&mut self, listener: Box<dyn PackageEventListener + 'a>) {
        self.listeners.push(listener);
    }

    /// Fire `installing`; returns `false` when a listener canceled.
    pub(crate) fn installing(&mut self, event: &mut PackageOperationEvent) -> bool {
        for listener in &mut self.listeners {
            listener.installing(event);
        }
        !event.cancel
    }

    pub(crate) fn installed(&mut self, event: &PackageOperationEvent) {
        for listener in &mut self.listeners {
            listener.installed(event);
        }
    }

    /// Fire `uninstalling`; returns `false` when a listener canceled.
    pub(crate) fn uninstalling(&mut self, event: &mut PackageOperationEvent) -> bool {
        for listener in &mut self.listeners {
            listener.uninstalling(event);
        }
        !event.cancel
    }

    pub(crate) fn uninstalled(&mut self, event: &PackageOperationEvent) {
        for listener in &mut self.listeners {
            listener.uninstalled(event);
        }
    }
}
