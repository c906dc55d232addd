//! The canonical per-employee record.

/// One employee's figures for the current reporting cycle.
///
/// `name` is the trimmed "Surname I" text and is the only key; two
/// submitters using the same name overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub name: String,
    pub pays: u32,
    pub calls: u32,
    /// Plan completion in percent. Carried through to the branch average,
    /// never used for scoring.
    pub plan_percent: u32,
}

impl EmployeeRecord {
    pub fn new(name: impl Into<String>, pays: u32, calls: u32, plan_percent: u32) -> Self {
        Self {
            name: name.into(),
            pays,
            calls,
            plan_percent,
        }
    }

    /// Efficiency score for this record, see [`super::efficiency::score`].
    pub fn efficiency(&self) -> u32 {
        super::efficiency::score(self.pays, self.calls)
    }
}
