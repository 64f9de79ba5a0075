/// A stack of identical items occupying one inventory slot.
///
/// Stacks are plain values: moving or copying one never aliases another slot.
/// A stack held in a slot always has `0 < quantity <= max_stack`; emptied
/// stacks are removed from their slot rather than kept at zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    /// Template name.
    pub template: String,
    pub quantity: u16,
}

impl ItemStack {
    pub fn new(template: impl Into<String>, quantity: u16) -> Self {
        Self {
            template: template.into(),
            quantity,
        }
    }

    pub fn is_same_kind(&self, other: &ItemStack) -> bool {
        self.template == other.template
    }
}
