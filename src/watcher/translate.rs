use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

use crate::event::Op;
use crate::watcher::adapter::RawKind;

/// Maps a raw backend notification to a canonical operation. `None` means the
/// notification carries nothing a consumer can act on and is dropped.
pub fn translate(kind: &RawKind) -> Option<Op> {
    match kind {
        RawKind::Notify(kind) => translate_notify(kind),
        RawKind::Flags(flags) => flags.decode(),
    }
}

fn translate_notify(kind: &EventKind) -> Option<Op> {
    match kind {
        EventKind::Create(_) => Some(Op::Create),
        EventKind::Remove(_) => Some(Op::Remove),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(Op::Chmod),
        // The new name arrives on its own; surfacing it as a creation lets the
        // registrar pick up directories moved into the tree.
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(Op::Create),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
        EventKind::Modify(ModifyKind::Name(_)) => Some(Op::Rename),
        EventKind::Modify(_) => Some(Op::Write),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
