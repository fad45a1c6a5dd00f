//! Change notification seam.
//!
//! After a successful equipment write the recomputation service hands the
//! fresh combat view to an emitter. Delivery (sockets, broadcast) belongs to
//! whoever implements the trait.

use tokio::sync::mpsc;

use crate::core::sheet::CombatView;

pub type EmitResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives the current view of a character after it changed.
pub trait SheetEventEmitter: Send + Sync {
    fn emit(&self, view: &CombatView) -> EmitResult;
}

/// Emitter that forwards views into an in-process channel.
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<CombatView>,
}

impl ChannelEmitter {
    pub fn new(tx: mpsc::UnboundedSender<CombatView>) -> Self {
        Self { tx }
    }

    /// Emitter plus the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CombatView>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl SheetEventEmitter for ChannelEmitter {
    fn emit(&self, view: &CombatView) -> EmitResult {
        self.tx.send(view.clone())?;
        Ok(())
    }
}
