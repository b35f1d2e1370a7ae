use crate::protocol::command::Tab;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub(super) enum Action {
    RefreshTimers,
    ToggleTimesheet,
    ToggleSettings,
    OpenHarvest,
    StartTimer { key: String },
    StopTimer { key: String },
    OpenLink { key: String },
    SelectTab { tab: Tab },
    RefetchSheet,
    SheetBack,
    SheetForward,
    CopyRange,
    SaveSettings,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
