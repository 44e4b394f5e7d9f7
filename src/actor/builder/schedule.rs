/// Rebuild scheduling state.
///
/// At most one build runs, and requests arriving during it collapse into a
/// single owed follow-up; there is no queue to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    #[default]
    Idle,
    Building,
    BuildingWithPendingRebuild,
}

impl Schedule {
    /// A rebuild was requested. Returns `true` if a build should start now.
    pub fn request(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Building;
                true
            }
            Self::Building | Self::BuildingWithPendingRebuild => {
                *self = Self::BuildingWithPendingRebuild;
                false
            }
        }
    }

    /// The running build finished. Returns `true` if another build is owed
    /// and should start now.
    pub fn finish(&mut self) -> bool {
        match self {
            Self::BuildingWithPendingRebuild => {
                *self = Self::Building;
                true
            }
            Self::Building | Self::Idle => {
                *self = Self::Idle;
                false
            }
        }
    }
}
