/// The kind of a cross-table interaction. Its discriminant is folded into the first message
/// element before the message is hashed onto the curve, so distinct kinds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum InteractionKind {
    /// Interaction with the memory table, such as read and write.
    Memory = 1,
}

impl InteractionKind {
    /// The discriminant as it is encoded into interaction messages.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
