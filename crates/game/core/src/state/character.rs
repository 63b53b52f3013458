use super::Unit;

/// A battle participant: identity plus a party of units.
///
/// Party slots may be empty; empty slots are pruned when a battle starts.
#[derive(Clone, Debug)]
pub struct Character {
    pub name: String,
    pub icon: Option<String>,
    party: Vec<Option<Unit>>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            party: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: append a unit to the next party slot.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.party.push(Some(unit));
        self
    }

    /// Builder: append an empty party slot.
    pub fn with_empty_slot(mut self) -> Self {
        self.party.push(None);
        self
    }

    pub fn party(&self) -> &[Option<Unit>] {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut Vec<Option<Unit>> {
        &mut self.party
    }

    /// Occupied party slots in order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.party.iter().flatten()
    }
}
