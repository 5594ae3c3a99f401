//! FSEvents flag bitmask and its decision table.
//!
//! The values mirror `kFSEventStreamEventFlag*` from CoreServices. They are
//! defined here rather than taken from the bindings so decoding can be tested
//! on every platform.

use bitflags::bitflags;

use crate::event::Op;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        const MUST_SCAN_SUB_DIRS = 0x0000_0001;
        const USER_DROPPED = 0x0000_0002;
        const KERNEL_DROPPED = 0x0000_0004;
        const EVENT_IDS_WRAPPED = 0x0000_0008;
        const HISTORY_DONE = 0x0000_0010;
        const ROOT_CHANGED = 0x0000_0020;
        const MOUNT = 0x0000_0040;
        const UNMOUNT = 0x0000_0080;
        const ITEM_CREATED = 0x0000_0100;
        const ITEM_REMOVED = 0x0000_0200;
        const ITEM_INODE_META_MOD = 0x0000_0400;
        const ITEM_RENAMED = 0x0000_0800;
        const ITEM_MODIFIED = 0x0000_1000;
        const ITEM_FINDER_INFO_MOD = 0x0000_2000;
        const ITEM_CHANGE_OWNER = 0x0000_4000;
        const ITEM_XATTR_MOD = 0x0000_8000;
        const ITEM_IS_FILE = 0x0001_0000;
        const ITEM_IS_DIR = 0x0002_0000;
        const ITEM_IS_SYMLINK = 0x0004_0000;
        const OWN_EVENT = 0x0008_0000;
        const ITEM_IS_HARDLINK = 0x0010_0000;
        const ITEM_IS_LAST_HARDLINK = 0x0020_0000;
        const ITEM_CLONED = 0x0040_0000;
    }
}

/// Evaluated top to bottom; the first row whose bits are all present wins.
/// Destructive changes come first because FSEvents coalesces flags and a
/// removed file usually also carries `ITEM_MODIFIED`.
const DECISION_TABLE: &[(EventFlags, Op)] = &[
    (EventFlags::ITEM_REMOVED, Op::Remove),
    (EventFlags::ITEM_RENAMED, Op::Rename),
    (EventFlags::ITEM_CHANGE_OWNER, Op::Chmod),
    (
        EventFlags::ITEM_MODIFIED.union(EventFlags::ITEM_CREATED),
        Op::Create,
    ),
    (EventFlags::ITEM_MODIFIED, Op::Write),
    (EventFlags::ITEM_CREATED, Op::Create),
];

const NAMES: &[(EventFlags, &str)] = &[
    (EventFlags::MUST_SCAN_SUB_DIRS, "MustScanSubDirs"),
    (EventFlags::USER_DROPPED, "UserDropped"),
    (EventFlags::KERNEL_DROPPED, "KernelDropped"),
    (EventFlags::EVENT_IDS_WRAPPED, "EventIDsWrapped"),
    (EventFlags::HISTORY_DONE, "HistoryDone"),
    (EventFlags::ROOT_CHANGED, "RootChanged"),
    (EventFlags::MOUNT, "Mount"),
    (EventFlags::UNMOUNT, "Unmount"),
    (EventFlags::ITEM_CREATED, "Created"),
    (EventFlags::ITEM_REMOVED, "Removed"),
    (EventFlags::ITEM_INODE_META_MOD, "InodeMetaMod"),
    (EventFlags::ITEM_RENAMED, "Renamed"),
    (EventFlags::ITEM_MODIFIED, "Modified"),
    (EventFlags::ITEM_FINDER_INFO_MOD, "FinderInfoMod"),
    (EventFlags::ITEM_CHANGE_OWNER, "ChangeOwner"),
    (EventFlags::ITEM_XATTR_MOD, "XAttrMod"),
    (EventFlags::ITEM_IS_FILE, "IsFile"),
    (EventFlags::ITEM_IS_DIR, "IsDir"),
    (EventFlags::ITEM_IS_SYMLINK, "IsSymLink"),
    (EventFlags::OWN_EVENT, "OwnEvent"),
    (EventFlags::ITEM_IS_HARDLINK, "IsHardlink"),
    (EventFlags::ITEM_IS_LAST_HARDLINK, "IsLastHardlink"),
    (EventFlags::ITEM_CLONED, "Cloned"),
];

impl EventFlags {
    /// Maps the bitmask to one canonical operation, or `None` when no
    /// recognised change bit is set (rescan markers, xattr-only changes).
    pub fn decode(self) -> Option<Op> {
        DECISION_TABLE
            .iter()
            .find(|(required, _)| self.contains(*required))
            .map(|(_, op)| *op)
    }

    /// True when the stream reports that events were lost.
    pub fn events_dropped(self) -> bool {
        self.intersects(EventFlags::USER_DROPPED | EventFlags::KERNEL_DROPPED)
    }

    /// Space separated flag names, for trace output.
    pub fn describe(self) -> String {
        NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
